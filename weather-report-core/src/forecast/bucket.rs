//! Grouping of forecast samples into calendar-day buckets.

use std::collections::HashMap;

use chrono::{FixedOffset, NaiveDate};

use crate::{
    forecast::ForecastError,
    model::{ForecastSample, local_datetime},
};

/// Temperatures of one calendar day and the condition of its first sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    day: NaiveDate,
    temperatures: Vec<f64>,
    condition: String,
}

impl DayBucket {
    fn new(day: NaiveDate, condition: String) -> Self {
        Self {
            day,
            temperatures: Vec::new(),
            condition,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Readings in arrival order. Never empty.
    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }
}

/// Day buckets in the order their day first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayBuckets {
    buckets: Vec<DayBucket>,
    index: HashMap<NaiveDate, usize>,
}

impl DayBuckets {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, day: NaiveDate) -> Option<&DayBucket> {
        self.index.get(&day).map(|&i| &self.buckets[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayBucket> {
        self.buckets.iter()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.buckets.iter().map(DayBucket::day)
    }

    fn push(&mut self, day: NaiveDate, temperature: f64, condition: &str) {
        let slot = *self.index.entry(day).or_insert_with(|| {
            self.buckets.push(DayBucket::new(day, condition.to_owned()));
            self.buckets.len() - 1
        });
        self.buckets[slot].temperatures.push(temperature);
    }
}

impl<'a> IntoIterator for &'a DayBuckets {
    type Item = &'a DayBucket;
    type IntoIter = std::slice::Iter<'a, DayBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Groups `samples` by local calendar day under `offset`.
///
/// Days keep the order in which they first occur in `samples`, and each
/// bucket keeps the condition of its first sample. Duplicate timestamps are
/// not collapsed.
pub fn bucket(samples: &[ForecastSample], offset: FixedOffset) -> Result<DayBuckets, ForecastError> {
    let mut buckets = DayBuckets::default();

    for (index, sample) in samples.iter().enumerate() {
        let day = local_day(sample.timestamp, offset).ok_or_else(|| {
            ForecastError::MalformedSample {
                index,
                reason: format!("timestamp {} is out of range", sample.timestamp),
            }
        })?;

        if sample.condition.trim().is_empty() {
            return Err(ForecastError::MalformedSample {
                index,
                reason: "condition label is missing".to_string(),
            });
        }

        if !sample.temperature.is_finite() {
            return Err(ForecastError::MalformedSample {
                index,
                reason: "temperature is not a finite number".to_string(),
            });
        }

        buckets.push(day, sample.temperature, &sample.condition);
    }

    Ok(buckets)
}

fn local_day(timestamp: i64, offset: FixedOffset) -> Option<NaiveDate> {
    local_datetime(timestamp, offset).map(|local| local.date())
}
