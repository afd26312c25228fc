//! Stage 5: information-theoretic confidence scoring.
//!
//! Three independent scalar summaries of the ranked-hypothesis
//! distribution, each a pure function:
//! - **NCI**: how much the top explanation dominates (max posterior)
//! - **DER**: how many bits of uncertainty the evidence removed (prior
//!   entropy minus posterior entropy, sign preserved)
//! - **CDS**: how concentrated the causal mass is (1 − normalized entropy)

use dt_math::{max_entropy_bits, normalize_weights, shannon_entropy_bits};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::hypotheses::RankedHypothesis;

/// Confidence summary of one ranked explanation set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConfidenceMetricsResult {
    /// Narrative confidence index: max posterior, in [0, 1].
    pub nci: f64,
    /// Decision entropy reduction in bits; negative when evidence
    /// increased uncertainty.
    pub der: f64,
    /// Causal directedness score, in [0, 1]; 1 when all mass sits on one
    /// hypothesis, 0 when uniform.
    pub cds: f64,
}

/// Max posterior across the ranked set; 0 for an empty set.
pub fn narrative_confidence_index(ranked: &[RankedHypothesis]) -> f64 {
    ranked.iter().map(|r| r.posterior).fold(0.0, f64::max)
}

/// Shannon entropy of the prior distribution minus that of the posterior,
/// in bits, both taken over strictly positive probabilities only.
///
/// The sign carries information and is never clamped.
pub fn decision_entropy_reduction(prior: &[f64], posterior: &[f64]) -> f64 {
    shannon_entropy_bits(prior) - shannon_entropy_bits(posterior)
}

/// 1 − H(normalized influences) / log2(n).
///
/// Influences are any non-negative weights over the hypotheses; here the
/// posteriors. A single candidate (or zero total mass) carries no
/// discriminative information and scores 0.
pub fn causal_directedness_score(influences: &[f64]) -> f64 {
    let Some(normalized) = normalize_weights(influences) else {
        return 0.0;
    };
    let h_max = max_entropy_bits(normalized.len());
    if h_max == 0.0 {
        return 0.0;
    }
    1.0 - shannon_entropy_bits(&normalized) / h_max
}

/// All three metrics for a ranked set, using the configured priors as the
/// before-evidence distribution and the posteriors as both the
/// after-evidence distribution and the influence weights.
pub fn confidence_metrics(ranked: &[RankedHypothesis]) -> ConfidenceMetricsResult {
    let priors: Vec<f64> = ranked.iter().map(|r| r.prior).collect();
    let posteriors: Vec<f64> = ranked.iter().map(|r| r.posterior).collect();

    ConfidenceMetricsResult {
        nci: narrative_confidence_index(ranked),
        der: decision_entropy_reduction(&priors, &posteriors),
        cds: causal_directedness_score(&posteriors),
    }
}
