//! Shannon entropy over discrete distributions, in bits.
//!
//! Probabilities that are exactly zero contribute zero to the sum (the
//! standard 0·log 0 = 0 convention), never NaN.

/// Shannon entropy H(p) in bits over the strictly positive entries of `probs`.
pub fn shannon_entropy_bits(probs: &[f64]) -> f64 {
    probs
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| -p * p.log2())
        .sum()
}

/// Maximum entropy of a distribution over `n` outcomes: log2(n).
///
/// Zero for n <= 1 (a single outcome carries no uncertainty).
pub fn max_entropy_bits(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    (n as f64).log2()
}

/// Normalize non-negative weights to a probability distribution.
///
/// Returns None when the total mass is zero or any weight is negative/NaN.
pub fn normalize_weights(weights: &[f64]) -> Option<Vec<f64>> {
    if weights.iter().any(|w| w.is_nan() || *w < 0.0) {
        return None;
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(weights.iter().map(|w| w / total).collect())
}
