//! Reduction of day buckets into per-day summaries.

use serde::{Deserialize, Serialize};

use crate::{
    forecast::bucket::{DayBucket, DayBuckets},
    model::round_to_tenth,
};

/// Published statistics for one forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// e.g. `Fri, Jan 05`
    pub date: String,
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    pub condition: String,
}

impl From<&DayBucket> for DaySummary {
    fn from(bucket: &DayBucket) -> Self {
        let temps = bucket.temperatures();
        assert!(
            !temps.is_empty(),
            "day bucket {} reached summarization without readings",
            bucket.day()
        );

        let sum: f64 = temps.iter().sum();
        let avg = sum / temps.len() as f64;
        let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = temps.iter().copied().fold(f64::INFINITY, f64::min);

        Self {
            date: bucket.day().format("%a, %b %d").to_string(),
            avg_temp: round_to_tenth(avg),
            max_temp: round_to_tenth(max),
            min_temp: round_to_tenth(min),
            condition: bucket.condition().to_owned(),
        }
    }
}

/// Summarizes at most `max_days` buckets, in the order the days first arrived.
///
/// This is arrival order, not calendar order: with out-of-order input the
/// retained days are not necessarily the earliest ones.
pub fn summarize(buckets: &DayBuckets, max_days: usize) -> Vec<DaySummary> {
    buckets.iter().take(max_days).map(DaySummary::from).collect()
}
