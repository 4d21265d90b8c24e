use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode};
use serde_json::to_string_pretty;
use tracing::info;
use weather_report_core::{
    Config, ProviderError, SnapshotStore, forecast_for_city, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-report", version, about = "Current weather and daily forecasts")]
pub struct Cli {
    /// Print JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and defaults.
    Configure,

    /// Show current weather for a city.
    Current {
        city: String,

        /// Store the result in the snapshot database.
        #[arg(long)]
        save: bool,
    },

    /// Show a per-day forecast summary for a city.
    Forecast {
        city: String,

        /// Number of days; defaults to the configured value.
        #[arg(long, short)]
        days: Option<usize>,
    },

    /// List stored snapshots, newest first.
    History {
        /// Only snapshots for this city.
        city: Option<String>,

        #[arg(long, short, default_value_t = 10)]
        limit: usize,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config)?,
            Command::Current { city, save } => {
                let provider = provider_from_config(&config)?;
                let current = provider.current(&city).await.map_err(user_facing)?;

                if save || config.store_snapshots {
                    let store = SnapshotStore::open(config.database_path()?)?;
                    let snapshot = store.record(&current)?;
                    info!(id = snapshot.id, city = %current.city, "snapshot saved");
                }

                if self.json {
                    println!("{}", to_string_pretty(&current)?);
                } else {
                    print!("{}", render::current(&current));
                }
            }
            Command::Forecast { city, days } => {
                let provider = provider_from_config(&config)?;
                let days = days.unwrap_or(config.forecast_days);
                let report = forecast_for_city(provider.as_ref(), &city, days)
                    .await
                    .map_err(user_facing)?;

                if self.json {
                    println!("{}", to_string_pretty(&report)?);
                } else {
                    print!("{}", render::forecast(&report));
                }
            }
            Command::History { city, limit } => {
                let store = SnapshotStore::open(config.database_path()?)?;
                let snapshots = store.recent(city.as_deref(), limit)?;

                if self.json {
                    println!("{}", to_string_pretty(&snapshots)?);
                } else {
                    print!("{}", render::history(&snapshots));
                }
            }
        }

        Ok(())
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    config.forecast_days = CustomType::<usize>::new("Forecast days:")
        .with_default(config.forecast_days)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Failed to read forecast days")?;

    config.store_snapshots = Confirm::new("Store every current-weather lookup?")
        .with_default(config.store_snapshots)
        .prompt()
        .context("Failed to read snapshot preference")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Leads with the user message, adding it as context only when it says something new.
fn user_facing(err: ProviderError) -> anyhow::Error {
    let message = err.user_message();
    if message == err.to_string() {
        anyhow::Error::new(err)
    } else {
        anyhow::Error::new(err).context(message)
    }
}
