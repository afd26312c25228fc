//! Stage 3: Bayesian ranking of configured causal hypotheses.
//!
//! Every hypothesis carries a prior and one of two likelihood models: a
//! declarative expectation profile evaluated by the shared matcher, or an
//! opaque rule scoring the signal map directly. Posteriors are
//! prior × likelihood renormalized over the whole set, so the ranking is a
//! proper distribution for the confidence metrics downstream.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use dt_common::Direction;
use dt_config::HypothesisConfig;
use dt_math::clip_unit;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::signals::SignalMap;

/// Multiplier applied when an observed direction contradicts an expected
/// one. A single contradicting feature weakens a hypothesis, it does not
/// eliminate it.
pub const MISMATCH_PENALTY: f64 = 0.2;

/// Likelihood of a hypothesis none of whose expected features produced a
/// matching signal. Silence neither confirms nor refutes.
pub const UNTESTED_LIKELIHOOD: f64 = 0.1;

/// Floor keeping likelihoods strictly positive under compounding penalties.
pub const LIKELIHOOD_FLOOR: f64 = 0.05;

/// A bespoke likelihood computation over the extracted signals.
///
/// Implementations must return a likelihood in (0, 1]; outputs are clamped
/// into [0, 1] defensively.
pub trait LikelihoodRule: Send + Sync {
    fn likelihood(&self, signals: &SignalMap) -> f64;
}

impl<F> LikelihoodRule for F
where
    F: Fn(&SignalMap) -> f64 + Send + Sync,
{
    fn likelihood(&self, signals: &SignalMap) -> f64 {
        self(signals)
    }
}

/// How a hypothesis is scored: declaratively or by rule.
pub enum LikelihoodModel {
    /// Expected direction per feature, evaluated by the shared matcher.
    Profile(BTreeMap<String, Direction>),
    /// Opaque scoring capability.
    Rule(Box<dyn LikelihoodRule>),
}

impl std::fmt::Debug for LikelihoodModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LikelihoodModel::Profile(p) => f.debug_tuple("Profile").field(p).finish(),
            LikelihoodModel::Rule(_) => f.debug_tuple("Rule").finish(),
        }
    }
}

/// A named candidate explanation with its prior belief.
#[derive(Debug)]
pub struct Hypothesis {
    pub name: String,
    pub prior: f64,
    pub model: LikelihoodModel,
}

impl Hypothesis {
    pub fn with_profile(
        name: impl Into<String>,
        prior: f64,
        profile: BTreeMap<String, Direction>,
    ) -> Self {
        Self {
            name: name.into(),
            prior,
            model: LikelihoodModel::Profile(profile),
        }
    }

    pub fn with_rule(
        name: impl Into<String>,
        prior: f64,
        rule: impl LikelihoodRule + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            prior,
            model: LikelihoodModel::Rule(Box::new(rule)),
        }
    }

    /// Build the runtime hypothesis set from declarative configuration.
    pub fn set_from_config(configs: &[HypothesisConfig]) -> Vec<Hypothesis> {
        configs
            .iter()
            .map(|config| {
                Hypothesis::with_profile(
                    config.name.clone(),
                    config.prior,
                    config.expectations.clone(),
                )
            })
            .collect()
    }
}

/// One entry of the ranked explanation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankedHypothesis {
    pub name: String,
    pub prior: f64,
    pub likelihood: f64,
    /// Renormalized posterior; the collection sums to 1.
    pub posterior: f64,
}

/// Generic expectation-matching likelihood.
///
/// Start at 1.0; every expected feature with a matching observed direction
/// multiplies in its strength, every contradiction multiplies in the soft
/// penalty, and features without a signal are skipped entirely. A
/// hypothesis with zero matches is untestable and scores the fixed weak
/// likelihood; everything else is floored away from zero.
pub fn profile_likelihood(
    signals: &SignalMap,
    expectations: &BTreeMap<String, Direction>,
) -> f64 {
    let mut score = 1.0;
    let mut matched = 0usize;

    for (feature, expected) in expectations {
        let Some(signal) = signals.get(feature) else {
            continue;
        };
        if signal.direction == *expected {
            score *= signal.strength;
            matched += 1;
        } else {
            score *= MISMATCH_PENALTY;
        }
    }

    if matched == 0 {
        return UNTESTED_LIKELIHOOD;
    }
    score.max(LIKELIHOOD_FLOOR)
}

/// Rank every configured hypothesis by posterior, descending.
///
/// Ties keep configuration order (stable sort). A zero total posterior mass
/// falls back to the uniform distribution rather than dividing by zero.
pub fn rank_hypotheses(signals: &SignalMap, hypotheses: &[Hypothesis]) -> Vec<RankedHypothesis> {
    if hypotheses.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<RankedHypothesis> = hypotheses
        .iter()
        .map(|hypothesis| {
            let likelihood = match &hypothesis.model {
                LikelihoodModel::Profile(profile) => profile_likelihood(signals, profile),
                LikelihoodModel::Rule(rule) => clip_unit(rule.likelihood(signals)),
            };
            RankedHypothesis {
                name: hypothesis.name.clone(),
                prior: hypothesis.prior,
                likelihood,
                posterior: hypothesis.prior * likelihood,
            }
        })
        .collect();

    let total: f64 = ranked.iter().map(|r| r.posterior).sum();
    if total > 0.0 {
        for entry in &mut ranked {
            entry.posterior /= total;
        }
    } else {
        let uniform = 1.0 / ranked.len() as f64;
        for entry in &mut ranked {
            entry.posterior = uniform;
        }
    }

    ranked.sort_by(|a, b| {
        b.posterior
            .partial_cmp(&a.posterior)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
