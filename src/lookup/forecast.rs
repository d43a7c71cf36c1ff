//! Current-weather (Open-Meteo forecast) client.

use std::sync::Arc;

use opentelemetry::Context;
use serde::Deserialize;

use crate::lookup::{traced_get_json, Coordinates, LookupError};
use crate::observability::Telemetry;

const STAGE: &str = "forecast";
const SPAN_NAME: &str = "Open-Meteo Forecast";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentTemperature {
    pub celsius: f64,
}

#[derive(Clone)]
pub struct ForecastClient {
    client: reqwest::Client,
    base_url: String,
    telemetry: Arc<Telemetry>,
}

impl ForecastClient {
    pub fn new(client: reqwest::Client, base_url: &str, telemetry: Arc<Telemetry>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            telemetry,
        }
    }

    pub async fn current(&self, parent: &Context, at: Coordinates) -> Result<CurrentTemperature, LookupError> {
        let url = format!(
            "{}/v1/forecast?latitude={:.6}&longitude={:.6}&current_weather=true",
            self.base_url, at.latitude, at.longitude
        );
        let body: ForecastResponse =
            traced_get_json(&self.client, &self.telemetry, parent, STAGE, SPAN_NAME, &url).await?;

        Ok(CurrentTemperature {
            celsius: body.current_weather.temperature,
        })
    }
}
