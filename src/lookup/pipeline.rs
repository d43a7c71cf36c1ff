//! The orchestrator's stage sequence: validate, locate, geocode, forecast,
//! convert. Each stage short-circuits on failure.

use opentelemetry::Context;
use thiserror::Error;

use crate::lookup::{
    is_valid_cep, DirectoryClient, ForecastClient, GeocodingClient, LookupError, TemperatureReport,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid zipcode")]
    InvalidCep,

    /// Directory lookup failed (`Some`) or returned no locality (`None`).
    #[error("zipcode not found")]
    CepNotFound(Option<LookupError>),

    /// Geocoding or forecast failed.
    #[error(transparent)]
    Weather(LookupError),
}

#[derive(Clone)]
pub struct WeatherPipeline {
    directory: DirectoryClient,
    geocoding: GeocodingClient,
    forecast: ForecastClient,
}

impl WeatherPipeline {
    pub fn new(directory: DirectoryClient, geocoding: GeocodingClient, forecast: ForecastClient) -> Self {
        Self {
            directory,
            geocoding,
            forecast,
        }
    }

    /// Run every stage for `cep` under `parent`. Calls are strictly sequential:
    /// each stage needs the previous one's output.
    pub async fn report_for(&self, parent: &Context, cep: &str) -> Result<TemperatureReport, PipelineError> {
        if !is_valid_cep(cep) {
            return Err(PipelineError::InvalidCep);
        }

        // The directory signals unknown codes with empty fields, not an error
        // status, so a transport failure and an empty city mean the same thing.
        let location = match self.directory.locate(parent, cep).await {
            Ok(location) if location.is_found() => location,
            Ok(_) => return Err(PipelineError::CepNotFound(None)),
            Err(e) => return Err(PipelineError::CepNotFound(Some(e))),
        };

        let coordinates = self
            .geocoding
            .coordinates(parent, &location.city_name)
            .await
            .map_err(PipelineError::Weather)?;

        let current = self
            .forecast
            .current(parent, coordinates)
            .await
            .map_err(PipelineError::Weather)?;

        Ok(TemperatureReport::new(location.city_name, current.celsius))
    }
}
