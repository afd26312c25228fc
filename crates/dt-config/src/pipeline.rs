//! Top-level pipeline configuration and YAML loading.

use std::collections::BTreeMap;
use std::path::Path;

use dt_common::Result;
use serde::{Deserialize, Serialize};

use crate::bounds::FeatureBounds;
use crate::hypotheses::HypothesisConfig;
use crate::state::StateSpec;

/// Weights for the three Stage 1 component signals.
///
/// Weights need not sum to 1; the combined risk score is clipped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    /// Weight of the covariance-distance signal.
    pub distance: f64,
    /// Weight of the threshold-exceedance persistence signal.
    pub persistence: f64,
    /// Weight of the configured risk-zone signal.
    pub risk_zone: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            distance: 0.35,
            persistence: 0.25,
            risk_zone: 0.25,
        }
    }
}

/// Everything the pipeline needs for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Features monitored by the multivariate distance statistic.
    pub features: Vec<String>,

    /// Operating bounds per feature; features without bounds contribute
    /// nothing to the risk-zone signal.
    #[serde(default)]
    pub bounds: BTreeMap<String, FeatureBounds>,

    /// Trailing analysis window length in days.
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Significance level for the distance threshold, in (0, 1).
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    #[serde(default)]
    pub weights: SignalWeights,

    /// Number of state-table rows used as the pre-window baseline.
    #[serde(default = "default_baseline_len")]
    pub baseline_len: usize,

    pub hypotheses: Vec<HypothesisConfig>,

    /// Optional state-builder spec for callers starting from raw events.
    #[serde(default)]
    pub state: Option<StateSpec>,
}

fn default_window_days() -> i64 {
    14
}

fn default_alpha() -> f64 {
    0.01
}

fn default_baseline_len() -> usize {
    30
}

impl PipelineConfig {
    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a YAML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }
}
