use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::DEFAULT_BASE_URL,
    model::{ForecastDay, ForecastDocument},
};

use super::{FetchError, ForecastProvider};

/// weatherapi.com `forecast.json` client.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast.json", self.base_url)
    }
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    async fn fetch_forecast(&self, location: &str) -> Result<ForecastDay, FetchError> {
        tracing::debug!(location, "requesting forecast from WeatherAPI");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", "1"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let parsed: ForecastDocument = serde_json::from_str(&body)?;
        let day = parsed.into_first_day().ok_or(FetchError::MissingForecastDay)??;

        tracing::debug!(hours = day.len(), "received forecast");
        Ok(day)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
