//! Aggregate raw timestamped events into a regular state table.
//!
//! One output row per occupied time bucket, one column per configured
//! feature. Missing columns and unknown aggregation kinds fail fast here so
//! the analytical stages can assume a validated table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike, Weekday};
use dt_common::{Error, Observation, Result, StateTable};
use dt_config::{Aggregation, StateSpec, TimeUnit};
use serde::{Deserialize, Serialize};

/// One raw event: a business timestamp plus named numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub time: NaiveDateTime,
    pub values: BTreeMap<String, f64>,
}

impl RawEvent {
    pub fn new(time: NaiveDateTime, values: BTreeMap<String, f64>) -> Self {
        Self { time, values }
    }
}

/// Build the system state table from raw events.
///
/// Events may arrive in any order; output rows are sorted by bucket. An
/// event lacking a configured feature is a fail-fast error, mirroring the
/// column checks a tabular source would perform.
pub fn build_state_table(events: &[RawEvent], spec: &StateSpec) -> Result<StateTable> {
    for feature in spec.aggregations.keys() {
        if events.iter().any(|e| !e.values.contains_key(feature)) {
            return Err(Error::MissingFeature {
                feature: feature.clone(),
            });
        }
    }

    let mut buckets: BTreeMap<NaiveDateTime, Vec<&RawEvent>> = BTreeMap::new();
    for event in events {
        buckets
            .entry(bucket_start(event.time, spec.time_unit))
            .or_default()
            .push(event);
    }

    let rows = buckets
        .into_iter()
        .map(|(time, members)| {
            let values = spec
                .aggregations
                .iter()
                .map(|(feature, aggregation)| {
                    let column: Vec<f64> =
                        members.iter().map(|e| e.values[feature.as_str()]).collect();
                    (feature.clone(), aggregate(&column, *aggregation))
                })
                .collect();
            Observation::new(time, values)
        })
        .collect();

    StateTable::new(rows)
}

/// Truncate a timestamp to the start of its bucket.
fn bucket_start(time: NaiveDateTime, unit: TimeUnit) -> NaiveDateTime {
    match unit {
        TimeUnit::Day => time.date().and_time(NaiveTime::MIN),
        TimeUnit::Week => time
            .date()
            .week(Weekday::Mon)
            .first_day()
            .and_time(NaiveTime::MIN),
        TimeUnit::Hour => {
            time.date().and_time(NaiveTime::MIN) + Duration::hours(time.hour() as i64)
        }
    }
}

/// Collapse a bucket's values into one cell. Buckets are never empty by
/// construction, so the folds are total.
fn aggregate(values: &[f64], aggregation: Aggregation) -> f64 {
    match aggregation {
        Aggregation::Sum => values.iter().sum(),
        Aggregation::Mean => values.iter().sum::<f64>() / values.len() as f64,
        Aggregation::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Aggregation::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Aggregation::Count => values.len() as f64,
        Aggregation::CountDistinct => {
            let distinct: BTreeSet<u64> = values.iter().map(|v| v.to_bits()).collect();
            distinct.len() as f64
        }
    }
}
