use std::time::Duration;

use async_trait::async_trait;
use chrono::FixedOffset;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    forecast::ForecastError,
    model::{CurrentWeather, ForecastSample, RawForecast, local_datetime, round_to_tenth},
};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProviderError::Request)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        what: &'static str,
    ) -> Result<T, ProviderError> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);
        debug!(%url, city, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(ProviderError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(ProviderError::from_transport)?;
        debug!(%status, bytes = body.len(), "OpenWeather {what} response");

        if status == StatusCode::NOT_FOUND {
            return Err(ProviderError::CityNotFound);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::InvalidApiKey);
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Parse { what, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_sample(self, index: usize) -> Result<ForecastSample, ForecastError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ForecastError::MalformedSample {
                index,
                reason: "no condition descriptor".to_string(),
            })?;

        Ok(ForecastSample {
            timestamp: self.dt,
            temperature: self.main.temp,
            condition,
        })
    }
}

impl OwCurrentResponse {
    fn into_current(self) -> Result<CurrentWeather, ProviderError> {
        let offset = utc_offset(self.timezone)?;
        let weather = self.weather.into_iter().next().ok_or_else(|| {
            ProviderError::MalformedResponse("current weather has no condition".to_string())
        })?;

        Ok(CurrentWeather {
            city: self.name,
            country: self.sys.country,
            temperature: round_to_tenth(self.main.temp),
            feels_like: round_to_tenth(self.main.feels_like),
            temp_min: round_to_tenth(self.main.temp_min),
            temp_max: round_to_tenth(self.main.temp_max),
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            description: title_case(&weather.description),
            icon: weather.icon,
            sunrise: local_clock(self.sys.sunrise, offset)?,
            sunset: local_clock(self.sys.sunset, offset)?,
        })
    }
}

impl OwForecastResponse {
    fn into_raw(self) -> Result<RawForecast, ProviderError> {
        let utc_offset = utc_offset(self.city.timezone)?;
        let samples = self
            .list
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_sample(i))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawForecast {
            city: self.city.name,
            country: self.city.country,
            utc_offset,
            samples,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentWeather, ProviderError> {
        let city = non_empty_city(city)?;
        let parsed: OwCurrentResponse = self.get_json("weather", city, "current weather").await?;
        parsed.into_current()
    }

    async fn forecast(&self, city: &str) -> Result<RawForecast, ProviderError> {
        let city = non_empty_city(city)?;
        let parsed: OwForecastResponse = self.get_json("forecast", city, "forecast").await?;
        parsed.into_raw()
    }
}

fn non_empty_city(city: &str) -> Result<&str, ProviderError> {
    let city = city.trim();
    if city.is_empty() {
        Err(ProviderError::EmptyCity)
    } else {
        Ok(city)
    }
}

fn utc_offset(seconds: i32) -> Result<FixedOffset, ProviderError> {
    FixedOffset::east_opt(seconds).ok_or_else(|| {
        ProviderError::MalformedResponse(format!("timezone offset {seconds}s is out of range"))
    })
}

fn local_clock(ts: i64, offset: FixedOffset) -> Result<String, ProviderError> {
    local_datetime(ts, offset)
        .map(|local| local.format("%H:%M").to_string())
        .ok_or_else(|| ProviderError::MalformedResponse(format!("timestamp {ts} is out of range")))
}

/// Upper-cases the first letter of every word, lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
