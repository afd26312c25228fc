//! State-builder configuration: time bucketing and per-feature aggregation.

use std::collections::BTreeMap;

use dt_common::{Error, Result};
use serde::{Deserialize, Serialize};

/// Granularity of the time buckets the state builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    Hour,
}

/// How raw event values collapse into one state-table cell per bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Mean,
    Max,
    Min,
    Count,
    CountDistinct,
}

impl Aggregation {
    /// Parse an aggregation kind by name, for callers assembling a spec
    /// from untyped sources. Unknown kinds fail fast.
    pub fn parse(feature: &str, kind: &str) -> Result<Self> {
        match kind {
            "sum" => Ok(Aggregation::Sum),
            "mean" => Ok(Aggregation::Mean),
            "max" => Ok(Aggregation::Max),
            "min" => Ok(Aggregation::Min),
            "count" => Ok(Aggregation::Count),
            "count_distinct" => Ok(Aggregation::CountDistinct),
            _ => Err(Error::UnknownAggregation {
                feature: feature.to_string(),
                kind: kind.to_string(),
            }),
        }
    }
}

/// Full state-builder spec: one aggregation per output feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub time_unit: TimeUnit,
    pub aggregations: BTreeMap<String, Aggregation>,
}

impl StateSpec {
    pub fn new(time_unit: TimeUnit) -> Self {
        Self {
            time_unit,
            aggregations: BTreeMap::new(),
        }
    }

    pub fn aggregate(mut self, feature: impl Into<String>, aggregation: Aggregation) -> Self {
        self.aggregations.insert(feature.into(), aggregation);
        self
    }

    /// Build a spec from (feature, kind-name) pairs, failing fast on
    /// unknown kinds.
    pub fn from_pairs<'a>(
        time_unit: TimeUnit,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let mut spec = Self::new(time_unit);
        for (feature, kind) in pairs {
            let aggregation = Aggregation::parse(feature, kind)?;
            spec.aggregations.insert(feature.to_string(), aggregation);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(Aggregation::parse("x", "sum").unwrap(), Aggregation::Sum);
        assert_eq!(
            Aggregation::parse("x", "count_distinct").unwrap(),
            Aggregation::CountDistinct
        );
    }

    #[test]
    fn parse_unknown_kind_fails_with_context() {
        let err = Aggregation::parse("orders", "median").unwrap_err();
        match err {
            Error::UnknownAggregation { feature, kind } => {
                assert_eq!(feature, "orders");
                assert_eq!(kind, "median");
            }
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn from_pairs_builds_spec() {
        let spec = StateSpec::from_pairs(
            TimeUnit::Day,
            [("orders", "sum"), ("lead_time", "mean")],
        )
        .unwrap();
        assert_eq!(spec.aggregations.len(), 2);
        assert_eq!(spec.aggregations["orders"], Aggregation::Sum);
    }

    #[test]
    fn from_pairs_propagates_unknown_kind() {
        assert!(StateSpec::from_pairs(TimeUnit::Day, [("orders", "mode")]).is_err());
    }

    #[test]
    fn yaml_roundtrip() {
        let spec = StateSpec::new(TimeUnit::Week)
            .aggregate("orders", Aggregation::Sum)
            .aggregate("users", Aggregation::CountDistinct);
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let back: StateSpec = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(spec, back);
    }

    #[test]
    fn unknown_kind_in_yaml_fails_at_parse() {
        let result: Result<StateSpec> = serde_yaml::from_str(
            "{ time_unit: day, aggregations: { orders: median } }",
        )
        .map_err(Into::into);
        assert!(result.is_err());
    }
}
