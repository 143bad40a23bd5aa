use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::model::HOURS_PER_DAY;

/// Limits the forecast window has to stay within for a ride to be recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// °C
    pub minimum_temperature: f64,
    /// °C
    pub maximum_temperature: f64,
    /// km/h
    pub maximum_wind_speed: f64,
    /// Percent.
    pub maximum_cloud_coverage: f64,
    /// Length of the window, in hours, starting at the current hour.
    pub hours_into_future: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            minimum_temperature: 15.0,
            maximum_temperature: 25.0,
            maximum_wind_speed: 20.0,
            maximum_cloud_coverage: 70.0,
            hours_into_future: 2,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("threshold `{0}` must be a finite number")]
    NotFinite(&'static str),
    #[error("minimum temperature {min} is above maximum temperature {max}")]
    InvertedTemperatureRange { min: f64, max: f64 },
    #[error("hours_into_future must be between 1 and 24, got {0}")]
    LookaheadOutOfRange(u32),
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let values = [
            ("minimum_temperature", self.minimum_temperature),
            ("maximum_temperature", self.maximum_temperature),
            ("maximum_wind_speed", self.maximum_wind_speed),
            ("maximum_cloud_coverage", self.maximum_cloud_coverage),
        ];
        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ThresholdError::NotFinite(*name));
        }

        if self.minimum_temperature > self.maximum_temperature {
            return Err(ThresholdError::InvertedTemperatureRange {
                min: self.minimum_temperature,
                max: self.maximum_temperature,
            });
        }

        if self.hours_into_future == 0 || self.hours_into_future as usize > HOURS_PER_DAY {
            return Err(ThresholdError::LookaheadOutOfRange(self.hours_into_future));
        }

        Ok(())
    }
}

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Where forecasts are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [thresholds]
/// minimum_temperature = 15.0
/// hours_into_future = 2
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// The weatherapi.com key, cached after the first prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Self::read_from(path)?;

        cfg.thresholds
            .validate()
            .with_context(|| format!("Invalid thresholds in config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Load config without validating thresholds, for commands that only touch the API key.
    pub fn read() -> Result<Self> {
        Self::read_from(&Self::config_file_path()?)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "cycling-forecast", "cycling")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the cached API key. A blank key counts as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }
}
