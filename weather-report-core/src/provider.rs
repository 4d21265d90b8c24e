use crate::{
    Config, CurrentWeather, RawForecast, forecast::ForecastError,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("City name must not be empty")]
    EmptyCity,

    #[error("City not found")]
    CityNotFound,

    #[error("Provider rejected the API key")]
    InvalidApiKey,

    #[error("Provider request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Provider request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("Could not connect to provider")]
    Connection(#[source] reqwest::Error),

    #[error("Provider request failed")]
    Request(#[source] reqwest::Error),

    #[error("Failed to parse {what} response")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

impl ProviderError {
    /// Sorts a transport error into timeout, connection or generic failure.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connection(err)
        } else {
            Self::Request(err)
        }
    }

    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCity => "Please enter a city name".to_string(),
            Self::CityNotFound => "City not found".to_string(),
            Self::InvalidApiKey => "Invalid API key. Please check your API key.".to_string(),
            Self::Status { status, .. } => format!("API Error: {}", status.as_u16()),
            Self::Timeout(_) => "Request timed out. Try again.".to_string(),
            Self::Connection(_) => "Connection error. Check your internet.".to_string(),
            Self::Request(err) => format!("Unexpected error: {err}"),
            Self::Parse { what, .. } => format!("Unexpected error: unreadable {what} data"),
            Self::MalformedResponse(msg) => format!("Unexpected error: {msg}"),
            Self::Forecast(err) => format!("Unexpected error: {err}"),
        }
    }

    /// HTTP status a presentation layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::EmptyCity => StatusCode::BAD_REQUEST,
            Self::CityNotFound => StatusCode::NOT_FOUND,
            Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
            Self::Status { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city`.
    async fn current(&self, city: &str) -> Result<CurrentWeather, ProviderError>;

    /// Validated forecast series for `city`.
    async fn forecast(&self, city: &str) -> Result<RawForecast, ProviderError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weather-report configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key.to_owned(), config.base_url(), config.timeout())?;
    Ok(Box::new(provider))
}
