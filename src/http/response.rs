//! Error responses.
//!
//! # Responsibilities
//! - Map handler failures to status codes and fixed plain-text bodies
//! - Keep collaborator error detail in the logs, out of the body
//!
//! The gateway is the exception: it relays whatever the orchestrator sent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::lookup::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid request body")]
    BadRequest,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("invalid zipcode")]
    ValidationFailed,

    #[error("can not find zipcode")]
    NotFound,

    #[error("upstream service unavailable")]
    UpstreamUnavailable,

    #[error("failed to fetch temperature")]
    InternalError,

    #[error("failed to forward request")]
    ForwardFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UpstreamUnavailable | ApiError::InternalError | ApiError::ForwardFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<&PipelineError> for ApiError {
    fn from(err: &PipelineError) -> Self {
        match err {
            PipelineError::InvalidCep => ApiError::ValidationFailed,
            PipelineError::CepNotFound(_) => ApiError::NotFound,
            // "No coordinates for this city" is a 500, unlike the 404 above.
            PipelineError::Weather(e) if e.is_transport() => ApiError::UpstreamUnavailable,
            PipelineError::Weather(_) => ApiError::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupError;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::BadRequest.status(), 400);
        assert_eq!(ApiError::MethodNotAllowed.status(), 405);
        assert_eq!(ApiError::ValidationFailed.status(), 422);
        assert_eq!(ApiError::NotFound.status(), 404);
        assert_eq!(ApiError::UpstreamUnavailable.status(), 500);
        assert_eq!(ApiError::InternalError.status(), 500);
        assert_eq!(ApiError::ForwardFailed.status(), 500);
    }

    #[test]
    fn missing_coordinates_is_internal_not_not_found() {
        let err = PipelineError::Weather(LookupError::CoordinatesNotFound {
            city: "Atlantis".into(),
        });
        assert_eq!(ApiError::from(&err), ApiError::InternalError);
        assert_eq!(ApiError::from(&PipelineError::CepNotFound(None)), ApiError::NotFound);
        assert_eq!(ApiError::from(&PipelineError::InvalidCep), ApiError::ValidationFailed);
    }

    #[tokio::test]
    async fn body_is_the_fixed_message() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"can not find zipcode");
    }
}
