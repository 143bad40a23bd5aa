use anyhow::{Context, bail};
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use cycling_core::{Config, run_configured_session};
use inquire::{Password, Text};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cycling", version, about = "Is it a good idea to go cycling today?")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch today's forecast and decide whether to go cycling.
    Check {
        /// Location to check; prompted for when absent.
        location: Option<String>,

        /// Hour of day (0-23) to start the lookahead window at; defaults to now.
        #[arg(long)]
        hour: Option<u32>,

        /// Print the decision as JSON.
        #[arg(long)]
        json: bool,

        /// Also print the averages the decision is based on.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Store the weatherAPI key, replacing any cached one.
    Configure {
        /// Key to store; prompted for when absent.
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the thresholds in effect.
    Thresholds,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Check { location, hour, json, verbose } => {
                check(location, hour, json, verbose).await
            }
            Command::Configure { api_key } => configure(api_key),
            Command::Thresholds => {
                let config = Config::load()?;
                print!("{}", render::thresholds(&config.thresholds));
                println!("config file: {}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn check(
    location: Option<String>,
    hour: Option<u32>,
    json: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.api_key().is_none() && cache_api_key(&mut config, prompt_api_key()?) {
        config.save()?;
    }

    let location = match location {
        Some(location) => location,
        None => Text::new("Enter your location:")
            .prompt()
            .context("Failed to read location")?,
    };

    let current_hour = hour.unwrap_or_else(|| Local::now().hour());
    if current_hour > 23 {
        bail!("--hour must be between 0 and 23, got {current_hour}");
    }

    tracing::debug!(location = %location, current_hour, "checking forecast");
    let outcome = run_configured_session(&config, &location, current_hour)
        .await
        .context("Could not evaluate the forecast")?;

    if let Some(err) = &outcome.fetch_error {
        eprintln!("Error: {err}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.decision)?);
        return Ok(());
    }

    print!("{}", render::report(&outcome.decision, &location));
    if verbose && let Some(summary) = &outcome.summary {
        println!("{}", render::summary(summary));
    }

    Ok(())
}

fn configure(api_key: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::read()?;

    let key = match api_key {
        Some(key) => key,
        None => prompt_api_key()?,
    };
    if !cache_api_key(&mut config, key) {
        bail!("API key must not be empty");
    }
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Stores `key` in `config` unless it is blank. Returns whether it was stored.
fn cache_api_key(config: &mut Config, key: String) -> bool {
    if key.trim().is_empty() {
        return false;
    }
    config.set_api_key(key);
    true
}

fn prompt_api_key() -> anyhow::Result<String> {
    Password::new("Enter your weatherAPI key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")
}
