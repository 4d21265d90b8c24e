use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One upstream forecast reading, already validated at the provider boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Unix timestamp (seconds) of the interval the reading belongs to.
    pub timestamp: i64,
    pub temperature: f64,
    pub condition: String,
}

impl ForecastSample {
    pub fn new(timestamp: i64, temperature: f64, condition: impl Into<String>) -> Self {
        Self {
            timestamp,
            temperature,
            condition: condition.into(),
        }
    }
}

/// Forecast series for a city as handed over by a provider.
#[derive(Debug, Clone)]
pub struct RawForecast {
    pub city: String,
    pub country: String,
    /// Offset of the provider's reporting timezone; day boundaries follow it.
    pub utc_offset: FixedOffset,
    pub samples: Vec<ForecastSample>,
}

/// Current conditions for a city, reshaped for clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    /// Local `HH:MM`.
    pub sunrise: String,
    /// Local `HH:MM`.
    pub sunset: String,
}

/// A stored copy of [`CurrentWeather`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub retrieved_at: DateTime<Utc>,
    #[serde(flatten)]
    pub weather: CurrentWeather,
}

/// Wall-clock time of the Unix timestamp `ts` at `offset`.
///
/// `None` when either the instant or its local time falls outside chrono's range.
pub fn local_datetime(ts: i64, offset: FixedOffset) -> Option<NaiveDateTime> {
    let utc = DateTime::from_timestamp(ts, 0)?;
    utc.naive_utc()
        .checked_add_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
