//! SQLite store for current-weather snapshots.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use std::{fs, path::Path};
use tracing::debug;

use crate::model::{CurrentWeather, Snapshot};

const SNAPSHOT_COLUMNS: &str = "id, retrieved_at_ms, city, country, temperature, feels_like, \
     temp_min, temp_max, humidity, pressure, wind_speed, description, icon, sunrise, sunset";

pub struct SnapshotStore {
    conn: Connection,
}

impl SnapshotStore {
    /// Open (or create) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open snapshot database: {}", path.display()))?;
        debug!(path = %path.display(), "opened snapshot database");

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store, gone when dropped.
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                retrieved_at_ms INTEGER NOT NULL,
                city TEXT NOT NULL,
                city_key TEXT NOT NULL,
                country TEXT NOT NULL,
                temperature REAL NOT NULL,
                feels_like REAL NOT NULL,
                temp_min REAL NOT NULL,
                temp_max REAL NOT NULL,
                humidity INTEGER NOT NULL,
                pressure INTEGER NOT NULL,
                wind_speed REAL NOT NULL,
                description TEXT NOT NULL,
                icon TEXT NOT NULL,
                sunrise TEXT NOT NULL,
                sunset TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_snapshots_city ON snapshots(city_key);
            CREATE INDEX IF NOT EXISTS idx_snapshots_retrieved ON snapshots(retrieved_at_ms);
            "#,
            )
            .context("Failed to initialize snapshot schema")?;
        Ok(())
    }

    /// Store `weather` stamped with the current time.
    pub fn record(&self, weather: &CurrentWeather) -> Result<Snapshot> {
        self.record_at(weather, Utc::now())
    }

    pub fn record_at(&self, weather: &CurrentWeather, retrieved_at: DateTime<Utc>) -> Result<Snapshot> {
        self.conn
            .execute(
                r#"
            INSERT INTO snapshots
            (retrieved_at_ms, city, city_key, country, temperature, feels_like, temp_min,
             temp_max, humidity, pressure, wind_speed, description, icon, sunrise, sunset)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
                params![
                    retrieved_at.timestamp_millis(),
                    weather.city,
                    city_key(&weather.city),
                    weather.country,
                    weather.temperature,
                    weather.feels_like,
                    weather.temp_min,
                    weather.temp_max,
                    weather.humidity,
                    weather.pressure,
                    weather.wind_speed,
                    weather.description,
                    weather.icon,
                    weather.sunrise,
                    weather.sunset,
                ],
            )
            .with_context(|| format!("Failed to store snapshot for {}", weather.city))?;

        let id = self.conn.last_insert_rowid();
        debug!(id, city = %weather.city, "stored snapshot");

        Ok(Snapshot {
            id,
            retrieved_at: millis_to_utc(retrieved_at.timestamp_millis())?,
            weather: weather.clone(),
        })
    }

    /// Newest snapshots first, at most `limit`, optionally for one city.
    ///
    /// City matching ignores case (full Unicode lower-casing) and surrounding whitespace.
    pub fn recent(&self, city: Option<&str>, limit: usize) -> Result<Vec<Snapshot>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let order = "ORDER BY retrieved_at_ms DESC, id DESC LIMIT";

        let snapshots = match city {
            Some(city) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {SNAPSHOT_COLUMNS} FROM snapshots WHERE city_key = ?1 {order} ?2"
                ))?;
                let rows = stmt.query_map(params![city_key(city), limit], row_to_snapshot)?;
                rows.collect::<Result<Vec<_>, _>>()
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("SELECT {SNAPSHOT_COLUMNS} FROM snapshots {order} ?1"))?;
                let rows = stmt.query_map(params![limit], row_to_snapshot)?;
                rows.collect::<Result<Vec<_>, _>>()
            }
        };

        snapshots.context("Failed to read snapshots")
    }
}

fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

fn row_to_snapshot(row: &Row<'_>) -> rusqlite::Result<Snapshot> {
    let millis: i64 = row.get(1)?;
    let retrieved_at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(1, millis)
    })?;

    Ok(Snapshot {
        id: row.get(0)?,
        retrieved_at,
        weather: CurrentWeather {
            city: row.get(2)?,
            country: row.get(3)?,
            temperature: row.get(4)?,
            feels_like: row.get(5)?,
            temp_min: row.get(6)?,
            temp_max: row.get(7)?,
            humidity: row.get(8)?,
            pressure: row.get(9)?,
            wind_speed: row.get(10)?,
            description: row.get(11)?,
            icon: row.get(12)?,
            sunrise: row.get(13)?,
            sunset: row.get(14)?,
        },
    })
}

fn millis_to_utc(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .with_context(|| format!("Timestamp {millis} is out of range"))
}
