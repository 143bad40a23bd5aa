//! Core library for the `cycling` CLI.
//!
//! This crate defines:
//! - Configuration, thresholds & the cached API key
//! - The weatherapi.com forecast provider
//! - The go/no-go decision over the next hours of forecast
//!
//! It is used by `cycling-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod decision;
pub mod model;
pub mod provider;
pub mod session;

pub use config::{Config, ProviderConfig, Thresholds};
pub use decision::{DecisionError, WindowSummary, decide};
pub use model::{Decision, ForecastDay, HourlySample, Reason};
pub use provider::{FetchError, ForecastProvider};
pub use session::{Outcome, run_configured_session, run_session};
