//! Postal-code directory (ViaCEP) client.

use std::sync::Arc;

use opentelemetry::Context;
use serde::Deserialize;

use crate::lookup::{traced_get_json, LookupError};
use crate::observability::Telemetry;

const STAGE: &str = "directory";
const SPAN_NAME: &str = "ViaCEP API";

/// ViaCEP body. Unknown codes come back as `{"erro": true}` with status 200,
/// so both fields default to empty.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

/// City and state a postal code belongs to. An empty `city_name` means the
/// directory does not know the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationResult {
    pub city_name: String,
    pub state_code: String,
}

impl LocationResult {
    pub fn is_found(&self) -> bool {
        !self.city_name.is_empty()
    }
}

#[derive(Clone)]
pub struct DirectoryClient {
    client: reqwest::Client,
    base_url: String,
    telemetry: Arc<Telemetry>,
}

impl DirectoryClient {
    pub fn new(client: reqwest::Client, base_url: &str, telemetry: Arc<Telemetry>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            telemetry,
        }
    }

    /// Look up `cep`. The caller validates the format first.
    pub async fn locate(&self, parent: &Context, cep: &str) -> Result<LocationResult, LookupError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        let body: ViaCepResponse =
            traced_get_json(&self.client, &self.telemetry, parent, STAGE, SPAN_NAME, &url).await?;

        Ok(LocationResult {
            city_name: body.localidade,
            state_code: body.uf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> DirectoryClient {
        DirectoryClient::new(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            &server.uri(),
            Arc::new(Telemetry::without_export("test", "0.0.0")),
        )
    }

    #[tokio::test]
    async fn resolves_city_and_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/01001000/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "localidade": "São Paulo",
                "uf": "SP"
            })))
            .mount(&server)
            .await;

        let location = client(&server).locate(&Context::new(), "01001000").await.unwrap();

        assert_eq!(
            location,
            LocationResult {
                city_name: "São Paulo".into(),
                state_code: "SP".into(),
            }
        );
        assert!(location.is_found());
    }

    #[tokio::test]
    async fn unknown_code_yields_empty_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ws/00000000/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "erro": true })))
            .mount(&server)
            .await;

        let location = client(&server).locate(&Context::new(), "00000000").await.unwrap();
        assert!(!location.is_found());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let err = client(&server).locate(&Context::new(), "12345678").await.unwrap_err();
        assert!(matches!(err, LookupError::UnexpectedStatus { status, .. } if status == 400));
    }
}
