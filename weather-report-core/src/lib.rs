//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap provider and its error taxonomy
//! - Daily forecast aggregation (day bucketing + summaries)
//! - A SQLite store for current-weather snapshots
//!
//! It is used by `weather-report-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod store;

pub use config::Config;
pub use forecast::{DaySummary, ForecastError, ForecastReport, daily_forecast, forecast_for_city};
pub use model::{CurrentWeather, ForecastSample, RawForecast, Snapshot};
pub use provider::{ProviderError, WeatherProvider, provider_from_config};
pub use store::SnapshotStore;
