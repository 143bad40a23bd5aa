use crate::{
    Config, ForecastDay,
    model::InvalidDay,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// Why a forecast could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to send forecast request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("Failed to parse forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Forecast response contained no forecastday data")]
    MissingForecastDay,

    #[error("Forecast response contained an unusable day: {0}")]
    InvalidDay(#[from] InvalidDay),

    #[error(
        "No API key configured.\n\
         Hint: run `cycling configure` and enter your weatherAPI key."
    )]
    MissingApiKey,
}

/// Source of a one-day hourly forecast for a location.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastDay, FetchError>;
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>, FetchError> {
    let api_key = config.api_key().ok_or(FetchError::MissingApiKey)?;

    let provider =
        WeatherApiProvider::with_base_url(api_key.to_owned(), config.provider.base_url.clone());

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, FetchError::MissingApiKey));
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = FetchError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "API key has been disabled.".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key has been disabled."));
    }
}
