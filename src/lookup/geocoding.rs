//! City-name geocoding (Open-Meteo) client.

use std::sync::Arc;

use opentelemetry::Context;
use serde::Deserialize;
use url::form_urlencoded;

use crate::lookup::{traced_get_json, LookupError};
use crate::observability::Telemetry;

const STAGE: &str = "geocoding";
const SPAN_NAME: &str = "Open-Meteo Geocoding";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Absent entirely when nothing matches.
    #[serde(default)]
    results: Vec<Coordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    telemetry: Arc<Telemetry>,
}

impl GeocodingClient {
    pub fn new(client: reqwest::Client, base_url: &str, telemetry: Arc<Telemetry>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            telemetry,
        }
    }

    /// Best single match for `city`, searched in Portuguese.
    pub async fn coordinates(&self, parent: &Context, city: &str) -> Result<Coordinates, LookupError> {
        let name: String = form_urlencoded::byte_serialize(city.as_bytes()).collect();
        let url = format!(
            "{}/v1/search?name={}&count=1&language=pt&format=json",
            self.base_url, name
        );
        let body: GeocodingResponse =
            traced_get_json(&self.client, &self.telemetry, parent, STAGE, SPAN_NAME, &url).await?;

        body.results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::CoordinatesNotFound { city: city.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GeocodingClient {
        GeocodingClient::new(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            &server.uri(),
            Arc::new(Telemetry::without_export("test", "0.0.0")),
        )
    }

    #[tokio::test]
    async fn returns_first_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "São Paulo"))
            .and(query_param("count", "1"))
            .and(query_param("language", "pt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "name": "São Paulo", "latitude": -23.5475, "longitude": -46.63611 }],
                "generationtime_ms": 0.5
            })))
            .mount(&server)
            .await;

        let coords = client(&server)
            .coordinates(&Context::new(), "São Paulo")
            .await
            .unwrap();

        assert_eq!(coords, Coordinates { latitude: -23.5475, longitude: -46.63611 });
    }

    #[tokio::test]
    async fn missing_results_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generationtime_ms": 0.3
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .coordinates(&Context::new(), "Cidade Inexistente")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "coordinates not found for city Cidade Inexistente");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_transport_error() {
        // Bind then release a port so nothing is listening on it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let geocoding = GeocodingClient::new(
            reqwest::Client::builder().no_proxy().build().unwrap(),
            &format!("http://{}", addr),
            Arc::new(Telemetry::without_export("test", "0.0.0")),
        );
        let err = geocoding.coordinates(&Context::new(), "Recife").await.unwrap_err();
        assert!(err.is_transport());
    }
}
