//! Plain-text rendering of core results.

use std::fmt::Write;

use chrono::Local;
use weather_report_core::{CurrentWeather, ForecastReport, Snapshot};

pub fn current(w: &CurrentWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}: {}", w.city, w.country, w.description);
    let _ = writeln!(
        out,
        "  Temperature  {:.1}°C (feels like {:.1}°C, {:.1}..{:.1}°C)",
        w.temperature, w.feels_like, w.temp_min, w.temp_max
    );
    let _ = writeln!(out, "  Humidity     {}%", w.humidity);
    let _ = writeln!(out, "  Pressure     {} hPa", w.pressure);
    let _ = writeln!(out, "  Wind         {:.1} m/s", w.wind_speed);
    let _ = writeln!(out, "  Sun          {} - {}", w.sunrise, w.sunset);
    out
}

pub fn forecast(report: &ForecastReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}, {}", report.city, report.country);
    if report.days.is_empty() {
        let _ = writeln!(out, "  No forecast data.");
    }
    for day in &report.days {
        let _ = writeln!(
            out,
            "  {}  avg {:>5.1}°C  min {:>5.1}°C  max {:>5.1}°C  {}",
            day.date, day.avg_temp, day.min_temp, day.max_temp, day.condition
        );
    }
    out
}

pub fn history(snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return "No stored snapshots.\n".to_string();
    }

    let mut out = String::new();
    for s in snapshots {
        let _ = writeln!(
            out,
            "{}  {}, {}  {:.1}°C  {}",
            s.retrieved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            s.weather.city,
            s.weather.country,
            s.weather.temperature,
            s.weather.description
        );
    }
    out
}
