//! Declarative hypothesis configuration.

use std::collections::BTreeMap;

use dt_common::Direction;
use serde::{Deserialize, Serialize};

/// A configured causal hypothesis: a prior belief plus the per-feature
/// directions the hypothesis expects to see when it is the true cause.
///
/// Hypotheses scored by bespoke code rather than the generic
/// expectation matcher leave `expectations` empty and are attached to a
/// likelihood rule at pipeline assembly time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisConfig {
    pub name: String,

    /// Prior probability in [0, 1]. Priors need not sum to 1 across the
    /// set; posteriors are renormalized.
    pub prior: f64,

    /// Expected direction per feature, matched against Stage 2 signals.
    #[serde(default)]
    pub expectations: BTreeMap<String, Direction>,
}

impl HypothesisConfig {
    pub fn new(name: impl Into<String>, prior: f64) -> Self {
        Self {
            name: name.into(),
            prior,
            expectations: BTreeMap::new(),
        }
    }

    pub fn expect(mut self, feature: impl Into<String>, direction: Direction) -> Self {
        self.expectations.insert(feature.into(), direction);
        self
    }
}
