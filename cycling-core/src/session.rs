use crate::{
    config::{Config, Thresholds},
    decision::{DecisionError, WindowSummary, summarize},
    model::{Decision, ForecastDay},
    provider::{FetchError, ForecastProvider, provider_from_config},
};

/// Result of one fetch-and-decide cycle.
#[derive(Debug)]
pub struct Outcome {
    pub decision: Decision,
    /// Set when the fetch failed; the decision is then the "no data" verdict.
    pub fetch_error: Option<FetchError>,
    pub summary: Option<WindowSummary>,
}

/// Fetch the forecast once for `location` and decide on it.
///
/// A failed fetch does not fail the session. It is handed back in the outcome for the
/// caller to report, and the decision falls back to "no data".
pub async fn run_session(
    provider: &dyn ForecastProvider,
    location: &str,
    current_hour: u32,
    thresholds: &Thresholds,
) -> Result<Outcome, DecisionError> {
    let fetched = provider.fetch_forecast(location).await;
    conclude(fetched, location, current_hour, thresholds)
}

/// Same as [`run_session`], with the provider built from `config`.
///
/// Without an API key nothing is fetched and the outcome carries
/// [`FetchError::MissingApiKey`].
pub async fn run_configured_session(
    config: &Config,
    location: &str,
    current_hour: u32,
) -> Result<Outcome, DecisionError> {
    match provider_from_config(config) {
        Ok(provider) => {
            run_session(provider.as_ref(), location, current_hour, &config.thresholds).await
        }
        Err(err) => conclude(Err(err), location, current_hour, &config.thresholds),
    }
}

fn conclude(
    fetched: Result<ForecastDay, FetchError>,
    location: &str,
    current_hour: u32,
    thresholds: &Thresholds,
) -> Result<Outcome, DecisionError> {
    let (forecast, fetch_error) = match fetched {
        Ok(day) => (Some(day), None),
        Err(err) => {
            tracing::warn!(location, error = %err, "forecast fetch failed");
            (None, Some(err))
        }
    };

    let summary = forecast
        .as_ref()
        .map(|day| summarize(day, current_hour, thresholds))
        .transpose()?;
    let decision = summary.map_or_else(Decision::no_data, |s| s.judge(thresholds));

    Ok(Outcome { decision, fetch_error, summary })
}
