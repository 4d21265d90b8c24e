//! Integration tests for the OpenWeather provider using wiremock.

use std::time::Duration;

use weather_report_core::{
    ForecastError, ProviderError, WeatherProvider, forecast_for_city,
    provider::openweather::OpenWeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".to_string(), &server.uri(), Duration::from_secs(5)).unwrap()
}

fn entry(dt: i64, temp: f64, description: &str) -> serde_json::Value {
    serde_json::json!({
        "dt": dt,
        "main": {"temp": temp, "feels_like": temp, "humidity": 50},
        "weather": [{"id": 800, "main": "x", "description": description, "icon": "01d"}]
    })
}

// 2024-01-05T00:00:00Z
const JAN_05: i64 = 1_704_412_800;
const HOUR: i64 = 3600;

#[tokio::test]
async fn current_weather_is_reshaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "London",
            "timezone": 0,
            "main": {"temp": 7.46, "feels_like": 4.21, "temp_min": 6.0, "temp_max": 8.93,
                     "humidity": 87, "pressure": 1009},
            "wind": {"speed": 5.14},
            "weather": [{"description": "light rain", "icon": "10d"}],
            "sys": {"country": "GB", "sunrise": JAN_05 + 8 * HOUR + 6 * 60, "sunset": JAN_05 + 16 * HOUR}
        })))
        .mount(&server)
        .await;

    let current = provider(&server).current("  London ").await.unwrap();

    assert_eq!(current.city, "London");
    assert_eq!(current.country, "GB");
    assert_eq!(current.temperature, 7.5);
    assert_eq!(current.feels_like, 4.2);
    assert_eq!(current.temp_max, 8.9);
    assert_eq!(current.description, "Light Rain");
    assert_eq!(current.sunrise, "08:06");
    assert_eq!(current.sunset, "16:00");
}

#[tokio::test]
async fn forecast_is_summarized_per_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Lisbon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Lisbon", "country": "PT", "timezone": 0},
            "list": [
                entry(JAN_05, 10.0, "clear"),
                entry(JAN_05 + 3 * HOUR, 14.0, "clear"),
                entry(JAN_05 + 24 * HOUR, 8.0, "rain"),
            ]
        })))
        .mount(&server)
        .await;

    let report = forecast_for_city(&provider(&server), "Lisbon", 5).await.unwrap();

    assert_eq!(report.city, "Lisbon");
    assert_eq!(report.country, "PT");
    assert_eq!(report.days.len(), 2);
    assert_eq!(report.days[0].date, "Fri, Jan 05");
    assert_eq!(report.days[0].avg_temp, 12.0);
    assert_eq!(report.days[0].max_temp, 14.0);
    assert_eq!(report.days[0].min_temp, 10.0);
    assert_eq!(report.days[0].condition, "clear");
    assert_eq!(report.days[1].date, "Sat, Jan 06");
    assert_eq!(report.days[1].avg_temp, 8.0);
    assert_eq!(report.days[1].condition, "rain");
}

#[tokio::test]
async fn forecast_days_follow_city_timezone() {
    let server = MockServer::start().await;

    // At UTC-5 the 03:00Z sample still belongs to Jan 4.
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "New York", "country": "US", "timezone": -5 * 3600},
            "list": [
                entry(JAN_05 + 3 * HOUR, -2.0, "snow"),
                entry(JAN_05 + 6 * HOUR, 0.0, "clouds"),
            ]
        })))
        .mount(&server)
        .await;

    let report = forecast_for_city(&provider(&server), "New York", 5).await.unwrap();
    let dates: Vec<_> = report.days.iter().map(|d| d.date.as_str()).collect();

    assert_eq!(dates, vec!["Thu, Jan 04", "Fri, Jan 05"]);
}

#[tokio::test]
async fn forecast_entry_without_condition_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": {"name": "Oslo", "country": "NO", "timezone": 3600},
            "list": [
                entry(JAN_05, 1.0, "mist"),
                {"dt": JAN_05 + 3 * HOUR, "main": {"temp": 2.0}, "weather": []},
            ]
        })))
        .mount(&server)
        .await;

    let err = forecast_for_city(&provider(&server), "Oslo", 5).await.unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Forecast(ForecastError::MalformedSample { index: 1, .. })
    ));
}

#[tokio::test]
async fn not_found_maps_to_city_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404", "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = provider(&server).current("Atlantis").await.unwrap_err();
    assert!(matches!(err, ProviderError::CityNotFound));
    assert_eq!(err.user_message(), "City not found");
}

#[tokio::test]
async fn unauthorized_maps_to_invalid_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = provider(&server).forecast("Paris").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidApiKey));
}

#[tokio::test]
async fn other_statuses_keep_code_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = provider(&server).current("Paris").await.unwrap_err();
    match &err {
        ProviderError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "API Error: 503");
}

#[tokio::test]
async fn invalid_json_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = provider(&server).current("Paris").await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse { what: "current weather", .. }));
}

#[tokio::test]
async fn empty_city_never_reaches_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider(&server).current("   ").await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyCity));
    assert_eq!(err.user_message(), "Please enter a city name");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let provider =
        OpenWeatherProvider::new("TEST_KEY".to_string(), &server.uri(), Duration::from_millis(200))
            .unwrap();

    let err = provider.current("Paris").await.unwrap_err();
    assert!(matches!(err, ProviderError::Timeout(_)), "got {err:?}");
    assert_eq!(err.user_message(), "Request timed out. Try again.");
}

#[tokio::test]
async fn unreachable_host_is_a_connection_error() {
    let provider =
        OpenWeatherProvider::new("TEST_KEY".to_string(), "http://127.0.0.1:1", Duration::from_secs(5))
            .unwrap();

    let err = provider.forecast("Paris").await.unwrap_err();
    assert!(matches!(err, ProviderError::Connection(_)), "got {err:?}");
}
