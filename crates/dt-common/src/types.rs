//! Core data model: observations, the state table, and directions.
//!
//! A `StateTable` is a time-ordered sequence of observations with a uniform
//! feature set. Both invariants (non-decreasing timestamps, identical feature
//! keys per row) are checked once at construction; every downstream slice is
//! a borrowed, immutable view, so the analytical stages never re-validate.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Direction of a metric's movement relative to its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Flat => write!(f, "flat"),
        }
    }
}

/// A single time-bucketed observation: one value per monitored feature.
///
/// Feature values use a `BTreeMap` so iteration order (and therefore
/// serialization and every derived computation) is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub values: BTreeMap<String, f64>,
}

impl Observation {
    pub fn new(time: NaiveDateTime, values: BTreeMap<String, f64>) -> Self {
        Self { time, values }
    }

    /// Value for a feature.
    ///
    /// Panics if the feature is absent; tables are validated at construction
    /// and pipeline entry, so lookups inside the stages are infallible.
    pub fn value(&self, feature: &str) -> f64 {
        self.values[feature]
    }
}

/// Time-ordered system state: one row per time bucket, uniform feature set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTable {
    rows: Vec<Observation>,
    features: Vec<String>,
}

impl StateTable {
    /// Build a table from rows, validating the ordering and uniformity
    /// invariants.
    pub fn new(rows: Vec<Observation>) -> Result<Self> {
        let features: Vec<String> = match rows.first() {
            Some(first) => first.values.keys().cloned().collect(),
            None => Vec::new(),
        };

        for (index, pair) in rows.windows(2).enumerate() {
            if pair[1].time < pair[0].time {
                return Err(Error::UnorderedTimestamps { index: index + 1 });
            }
        }
        for (index, row) in rows.iter().enumerate() {
            if row.values.len() != features.len()
                || !row.values.keys().zip(features.iter()).all(|(a, b)| a == b)
            {
                return Err(Error::InconsistentFeatures { index });
            }
        }

        Ok(Self { rows, features })
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Feature names present in every row, in sorted order.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f == name)
    }

    /// Timestamp of the most recent row, if any.
    pub fn latest_time(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.time)
    }

    /// Rows with `start <= time <= end` (both ends inclusive).
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> &[Observation] {
        let lo = self.rows.partition_point(|r| r.time < start);
        let hi = self.rows.partition_point(|r| r.time <= end);
        &self.rows[lo..hi.max(lo)]
    }

    /// The `len` most recent rows with `time < cutoff`.
    pub fn tail_before(&self, cutoff: NaiveDateTime, len: usize) -> &[Observation] {
        let hi = self.rows.partition_point(|r| r.time < cutoff);
        let lo = hi.saturating_sub(len);
        &self.rows[lo..hi]
    }
}
