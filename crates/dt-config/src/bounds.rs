//! Per-feature operating bounds.
//!
//! Bounds are directional: a lower-bound feature (inventory, fulfillment
//! rate) degrades as it falls, an upper-bound feature (lead time, error
//! rate) degrades as it rises. The direction is encoded by which threshold
//! pair is present, and a bounds record carries exactly one pair.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Expected / caution / critical thresholds for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureBounds {
    /// Values are healthy at or above `expected_min`, cautionary down to
    /// `caution_min`, critical below that.
    Lower { expected_min: f64, caution_min: f64 },
    /// Values are healthy at or below `expected_max`, cautionary up to
    /// `caution_max`, critical above that.
    Upper { expected_max: f64, caution_max: f64 },
}

impl<'de> Deserialize<'de> for FeatureBounds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            expected_min: Option<f64>,
            caution_min: Option<f64>,
            expected_max: Option<f64>,
            caution_max: Option<f64>,
        }

        let raw = Raw::deserialize(deserializer)?;
        match (
            raw.expected_min,
            raw.caution_min,
            raw.expected_max,
            raw.caution_max,
        ) {
            (Some(expected_min), Some(caution_min), None, None) => Ok(FeatureBounds::Lower {
                expected_min,
                caution_min,
            }),
            (None, None, Some(expected_max), Some(caution_max)) => Ok(FeatureBounds::Upper {
                expected_max,
                caution_max,
            }),
            _ => Err(D::Error::custom(
                "bounds must carry exactly one of (expected_min, caution_min) \
                 or (expected_max, caution_max)",
            )),
        }
    }
}

impl FeatureBounds {
    pub fn lower(expected_min: f64, caution_min: f64) -> Self {
        FeatureBounds::Lower {
            expected_min,
            caution_min,
        }
    }

    pub fn upper(expected_max: f64, caution_max: f64) -> Self {
        FeatureBounds::Upper {
            expected_max,
            caution_max,
        }
    }

    /// Thresholds must be finite and ordered so the caution band sits
    /// between expected and critical.
    pub(crate) fn check(&self) -> Result<(), String> {
        match *self {
            FeatureBounds::Lower {
                expected_min,
                caution_min,
            } => {
                if !expected_min.is_finite() || !caution_min.is_finite() {
                    return Err("thresholds must be finite".to_string());
                }
                if caution_min > expected_min {
                    return Err(format!(
                        "caution_min ({caution_min}) must not exceed expected_min ({expected_min})"
                    ));
                }
            }
            FeatureBounds::Upper {
                expected_max,
                caution_max,
            } => {
                if !expected_max.is_finite() || !caution_max.is_finite() {
                    return Err("thresholds must be finite".to_string());
                }
                if caution_max < expected_max {
                    return Err(format!(
                        "caution_max ({caution_max}) must not fall below expected_max ({expected_max})"
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_lower_pair() {
        let b: FeatureBounds =
            serde_yaml::from_str("{ expected_min: 100.0, caution_min: 80.0 }").unwrap();
        assert_eq!(b, FeatureBounds::lower(100.0, 80.0));
    }

    #[test]
    fn deserialize_upper_pair() {
        let b: FeatureBounds =
            serde_yaml::from_str("{ expected_max: 5.0, caution_max: 8.0 }").unwrap();
        assert_eq!(b, FeatureBounds::upper(5.0, 8.0));
    }

    #[test]
    fn deserialize_rejects_mixed_pairs() {
        let result: Result<FeatureBounds, _> =
            serde_yaml::from_str("{ expected_min: 100.0, caution_max: 8.0 }");
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_all_four_keys() {
        let result: Result<FeatureBounds, _> = serde_yaml::from_str(
            "{ expected_min: 1.0, caution_min: 0.5, expected_max: 2.0, caution_max: 3.0 }",
        );
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_keys() {
        let result: Result<FeatureBounds, _> =
            serde_yaml::from_str("{ expected_min: 1.0, caution_min: 0.5, warn_min: 0.2 }");
        assert!(result.is_err());
    }

    #[test]
    fn serialize_roundtrips() {
        let b = FeatureBounds::upper(5.0, 8.0);
        let yaml = serde_yaml::to_string(&b).unwrap();
        let back: FeatureBounds = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(b, back);
    }

    #[test]
    fn check_rejects_inverted_lower() {
        assert!(FeatureBounds::lower(80.0, 100.0).check().is_err());
        assert!(FeatureBounds::lower(100.0, 80.0).check().is_ok());
        assert!(FeatureBounds::lower(100.0, 100.0).check().is_ok());
    }

    #[test]
    fn check_rejects_inverted_upper() {
        assert!(FeatureBounds::upper(8.0, 5.0).check().is_err());
        assert!(FeatureBounds::upper(5.0, 8.0).check().is_ok());
    }

    #[test]
    fn check_rejects_non_finite() {
        assert!(FeatureBounds::upper(f64::NAN, 8.0).check().is_err());
        assert!(FeatureBounds::lower(f64::INFINITY, 0.0).check().is_err());
    }
}
