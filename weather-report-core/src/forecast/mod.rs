//! Daily forecast aggregation.
//!
//! A forecast series of (typically 3-hourly) samples is grouped into
//! calendar days by [`bucket`] and reduced to per-day statistics by
//! [`summarize`]. Both steps are pure and keep no state between calls.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    model::{ForecastSample, RawForecast},
    provider::{ProviderError, WeatherProvider},
};

pub mod bucket;
pub mod summary;

pub use bucket::{DayBucket, DayBuckets, bucket};
pub use summary::{DaySummary, summarize};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Malformed forecast sample #{index}: {reason}")]
    MalformedSample { index: usize, reason: String },
}

/// Daily summaries for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub country: String,
    pub days: Vec<DaySummary>,
}

impl ForecastReport {
    pub fn build(raw: &RawForecast, max_days: usize) -> Result<Self, ForecastError> {
        let days = daily_forecast(&raw.samples, raw.utc_offset, max_days)?;

        Ok(Self {
            city: raw.city.clone(),
            country: raw.country.clone(),
            days,
        })
    }
}

/// Groups `samples` into local days and summarizes the first `max_days` of them.
pub fn daily_forecast(
    samples: &[ForecastSample],
    offset: FixedOffset,
    max_days: usize,
) -> Result<Vec<DaySummary>, ForecastError> {
    let buckets = bucket(samples, offset)?;
    Ok(summarize(&buckets, max_days))
}

/// Fetches the forecast for `city` and reduces it to at most `max_days` days.
pub async fn forecast_for_city(
    provider: &dyn WeatherProvider,
    city: &str,
    max_days: usize,
) -> Result<ForecastReport, ProviderError> {
    let raw = provider.forecast(city).await?;
    Ok(ForecastReport::build(&raw, max_days)?)
}
