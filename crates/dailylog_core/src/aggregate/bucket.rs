//! Per-period averaging of entry metrics.
//!
//! # Invariants
//! - Aggregation is pure: inputs are borrowed and never mutated.
//! - Buckets are created lazily, so every emitted bucket has `count >= 1`.
//! - Results are recomputed from scratch on every call.

use super::period::{Granularity, InvalidGranularity};
use crate::model::entry::Entry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Averaged metrics for one period key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub avg_sleep_hours: f64,
    pub avg_calories: f64,
    pub avg_hydration: f64,
    pub avg_running_mileage: f64,
    /// Number of entries folded into this bucket.
    pub count: u32,
}

/// Period key -> averaged bucket. Keys iterate in lexicographic order.
pub type BucketMap = BTreeMap<String, Bucket>;

#[derive(Debug, Default)]
struct Sums {
    sleep_hours: f64,
    calories: f64,
    hydration: f64,
    running_mileage: f64,
    count: u32,
}

impl Sums {
    fn add(&mut self, entry: &Entry) {
        self.sleep_hours += entry.sleep_hours;
        self.calories += entry.calories as f64;
        self.hydration += entry.hydration;
        self.running_mileage += entry.running_mileage;
        self.count += 1;
    }

    fn average(&self) -> Bucket {
        let n = f64::from(self.count);
        Bucket {
            avg_sleep_hours: self.sleep_hours / n,
            avg_calories: self.calories / n,
            avg_hydration: self.hydration / n,
            avg_running_mileage: self.running_mileage / n,
            count: self.count,
        }
    }
}

/// Buckets `entries` by period and averages each metric.
///
/// Input order does not affect the result; duplicate dates are averaged like
/// any other entries sharing a key.
pub fn aggregate(entries: &[Entry], granularity: Granularity) -> BucketMap {
    let mut sums: BTreeMap<String, Sums> = BTreeMap::new();
    for entry in entries {
        sums.entry(granularity.period_key(entry.date))
            .or_default()
            .add(entry);
    }

    sums.into_iter()
        .map(|(key, sums)| (key, sums.average()))
        .collect()
}

/// Parses `granularity` and aggregates.
///
/// # Errors
/// - `InvalidGranularity` for anything other than `day|week|month|year`.
pub fn aggregate_named(
    entries: &[Entry],
    granularity: &str,
) -> Result<BucketMap, InvalidGranularity> {
    Ok(aggregate(entries, granularity.parse()?))
}

/// All four aggregations over one listing, as consumed by chart views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub daily: BucketMap,
    pub weekly: BucketMap,
    pub monthly: BucketMap,
    pub yearly: BucketMap,
}

impl ChartData {
    /// Returns the series for one granularity.
    pub fn series(&self, granularity: Granularity) -> &BucketMap {
        match granularity {
            Granularity::Day => &self.daily,
            Granularity::Week => &self.weekly,
            Granularity::Month => &self.monthly,
            Granularity::Year => &self.yearly,
        }
    }
}

pub fn chart_data(entries: &[Entry]) -> ChartData {
    ChartData {
        daily: aggregate(entries, Granularity::Day),
        weekly: aggregate(entries, Granularity::Week),
        monthly: aggregate(entries, Granularity::Month),
        yearly: aggregate(entries, Granularity::Year),
    }
}
