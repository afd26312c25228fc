//! Stage 1: windowed multivariate anomaly assessment.
//!
//! Scores the trailing analysis window with three component signals and
//! gates the rest of the pipeline:
//! - **distance**: quadratic-form distance of each row from the window
//!   centroid under the inverse covariance, compared against a chi-square
//!   quantile threshold
//! - **persistence**: how many rows exceeded the threshold
//! - **risk zone**: how deep bounded features sit in their caution/critical
//!   bands
//!
//! Expected degenerate inputs (short windows, singular covariance) produce
//! terminal or degraded results, never errors.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use dt_common::{Observation, StateTable};
use dt_config::{FeatureBounds, SignalWeights};
use dt_math::{
    add_ridge, chi_square_quantile, clip_unit, covariance_matrix, invert_matrix, mean_vector,
    quadratic_form, round3,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ridge added to the covariance diagonal before inversion.
const COVARIANCE_RIDGE: f64 = 1e-6;

/// Threshold-exceeding rows at which the persistence signal saturates.
const PERSISTENCE_SATURATION: f64 = 5.0;

/// Risk-zone score at or above which the critical-count override can fire.
const OVERRIDE_ZONE_SCORE: f64 = 0.6;

/// Independently critical features required for the override.
const OVERRIDE_CRITICAL_COUNT: usize = 2;

/// Severity of the window-level anomaly verdict.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyLevel {
    None,
    Marginal,
    Moderate,
    Strong,
}

impl AnomalyLevel {
    /// Classify a weighted risk score in [0, 1].
    pub fn from_risk_score(score: f64) -> Self {
        if score < 0.20 {
            AnomalyLevel::None
        } else if score < 0.40 {
            AnomalyLevel::Marginal
        } else if score < 0.65 {
            AnomalyLevel::Moderate
        } else {
            AnomalyLevel::Strong
        }
    }
}

impl std::fmt::Display for AnomalyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyLevel::None => write!(f, "none"),
            AnomalyLevel::Marginal => write!(f, "marginal"),
            AnomalyLevel::Moderate => write!(f, "moderate"),
            AnomalyLevel::Strong => write!(f, "strong"),
        }
    }
}

/// Whether the explanation stages run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecisionGate {
    Proceed,
    Stop,
}

impl DecisionGate {
    /// Only moderate and strong anomalies are worth explaining.
    pub fn from_level(level: AnomalyLevel) -> Self {
        if matches!(level, AnomalyLevel::Moderate | AnomalyLevel::Strong) {
            DecisionGate::Proceed
        } else {
            DecisionGate::Stop
        }
    }
}

impl std::fmt::Display for DecisionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionGate::Proceed => write!(f, "proceed"),
            DecisionGate::Stop => write!(f, "stop"),
        }
    }
}

/// Zone a bounded feature's value falls into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskZone {
    Expected,
    Caution,
    Critical,
}

impl RiskZone {
    fn score(self) -> f64 {
        match self {
            RiskZone::Expected => 0.0,
            RiskZone::Caution => 0.5,
            RiskZone::Critical => 1.0,
        }
    }
}

/// Summary of the per-row distance statistic over the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistanceSummary {
    pub mean: f64,
    pub max: f64,
    pub threshold: f64,
    pub exceedance_count: usize,
}

/// The three component signals, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignalScores {
    pub distance: f64,
    pub persistence: f64,
    pub risk_zone: f64,
}

/// Stage 1 output: the anomaly verdict for one analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Stage1Result {
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub anomaly_level: AnomalyLevel,
    /// Weighted combination of the component signals, in [0, 1].
    pub risk_score: f64,
    pub decision_gate: DecisionGate,
    pub distance_summary: DistanceSummary,
    pub signals: SignalScores,
    /// Worst zone each bounded feature reached anywhere in the window.
    pub risk_zone_hits: BTreeMap<String, RiskZone>,
    /// Set on the terminal insufficient-data path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Assess the trailing window of `table` and decide whether to proceed.
///
/// The window covers `[latest − window_days, latest]`. Fewer than 2 rows in
/// the window is the single designed early exit: a terminal stop result with
/// a zeroed summary. All rounding happens here at the result boundary; the
/// classification itself runs at full precision.
pub fn assess_window(
    table: &StateTable,
    features: &[String],
    bounds: &BTreeMap<String, FeatureBounds>,
    window_days: i64,
    alpha: f64,
    weights: &SignalWeights,
) -> Stage1Result {
    let window_end = table.latest_time().unwrap_or_default();
    let window_start = window_end - Duration::days(window_days);
    let window = table.window(window_start, window_end);

    if window.len() < 2 {
        return terminal(
            window_start,
            window_end,
            "insufficient data in analysis window",
        );
    }

    let (distance_summary, distance_score, persistence_score) =
        distance_signals(window, features, alpha);

    let (risk_zone_score, risk_zone_hits) = risk_zone_signal(window, bounds);
    let critical_count = risk_zone_hits
        .values()
        .filter(|zone| **zone == RiskZone::Critical)
        .count();

    let risk_score = clip_unit(
        weights.distance * distance_score
            + weights.persistence * persistence_score
            + weights.risk_zone * risk_zone_score,
    );

    // A small number of severely breached KPIs must not be diluted by the
    // weighted average.
    let override_fires =
        risk_zone_score >= OVERRIDE_ZONE_SCORE && critical_count >= OVERRIDE_CRITICAL_COUNT;
    let anomaly_level = if override_fires {
        AnomalyLevel::Strong
    } else {
        AnomalyLevel::from_risk_score(risk_score)
    };
    let decision_gate = DecisionGate::from_level(anomaly_level);

    Stage1Result {
        window_start,
        window_end,
        anomaly_level,
        risk_score: round3(risk_score),
        decision_gate,
        distance_summary: DistanceSummary {
            mean: round3(distance_summary.mean),
            max: round3(distance_summary.max),
            threshold: round3(distance_summary.threshold),
            exceedance_count: distance_summary.exceedance_count,
        },
        signals: SignalScores {
            distance: round3(distance_score),
            persistence: round3(persistence_score),
            risk_zone: round3(risk_zone_score),
        },
        risk_zone_hits,
        reason: None,
    }
}

fn terminal(window_start: NaiveDateTime, window_end: NaiveDateTime, reason: &str) -> Stage1Result {
    Stage1Result {
        window_start,
        window_end,
        anomaly_level: AnomalyLevel::None,
        risk_score: 0.0,
        decision_gate: DecisionGate::Stop,
        distance_summary: DistanceSummary::default(),
        signals: SignalScores::default(),
        risk_zone_hits: BTreeMap::new(),
        reason: Some(reason.to_string()),
    }
}

/// Per-row centroid distances, the chi-square threshold, and the distance
/// and persistence signals derived from them.
fn distance_signals(
    window: &[Observation],
    features: &[String],
    alpha: f64,
) -> (DistanceSummary, f64, f64) {
    let rows: Vec<Vec<f64>> = window
        .iter()
        .map(|obs| features.iter().map(|f| obs.value(f)).collect())
        .collect();

    let mean = mean_vector(&rows);
    let mut covariance = covariance_matrix(&rows, &mean);
    add_ridge(&mut covariance, COVARIANCE_RIDGE);
    let inverse = invert_matrix(&covariance).unwrap_or_else(|| diagonal_inverse(&covariance));

    let distances: Vec<f64> = rows
        .iter()
        .map(|row| {
            let diff: Vec<f64> = row.iter().zip(&mean).map(|(x, m)| x - m).collect();
            quadratic_form(&diff, &inverse)
        })
        .collect();

    let threshold = chi_square_quantile(1.0 - alpha, features.len());
    let mean_distance = distances.iter().sum::<f64>() / distances.len() as f64;
    let max_distance = distances.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exceedance_count = distances.iter().filter(|&&d| d > threshold).count();

    let distance_score = if threshold > 0.0 {
        clip_unit(0.4 * (mean_distance / threshold) + 0.6 * (max_distance / threshold))
    } else {
        0.0
    };
    let persistence_score = clip_unit(exceedance_count as f64 / PERSISTENCE_SATURATION);

    (
        DistanceSummary {
            mean: mean_distance,
            max: max_distance,
            threshold,
            exceedance_count,
        },
        distance_score,
        persistence_score,
    )
}

/// Last-resort fallback when the ridged covariance still fails to invert:
/// the diagonal inverse, which reduces the distance to per-feature z² terms.
fn diagonal_inverse(covariance: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = covariance.len();
    let mut inverse = vec![vec![0.0; n]; n];
    for (i, row) in inverse.iter_mut().enumerate() {
        row[i] = 1.0 / covariance[i][i].max(COVARIANCE_RIDGE);
    }
    inverse
}

/// Mean-of-means severity score plus the worst zone per bounded feature.
///
/// The hit label is the max per-row classification while the severity
/// contribution is the mean per-row score: worst-case labeling, averaged
/// severity.
fn risk_zone_signal(
    window: &[Observation],
    bounds: &BTreeMap<String, FeatureBounds>,
) -> (f64, BTreeMap<String, RiskZone>) {
    let mut feature_means = Vec::new();
    let mut hits = BTreeMap::new();

    for (feature, feature_bounds) in bounds {
        let zones: Vec<RiskZone> = window
            .iter()
            .map(|obs| classify_zone(obs.value(feature), feature_bounds))
            .collect();
        let mean_score = zones.iter().map(|z| z.score()).sum::<f64>() / zones.len() as f64;
        let worst = zones.iter().copied().max().unwrap_or(RiskZone::Expected);

        feature_means.push(mean_score);
        hits.insert(feature.clone(), worst);
    }

    let score = if feature_means.is_empty() {
        0.0
    } else {
        clip_unit(feature_means.iter().sum::<f64>() / feature_means.len() as f64)
    };
    (score, hits)
}

/// Classify one value against directional bounds.
fn classify_zone(value: f64, bounds: &FeatureBounds) -> RiskZone {
    match *bounds {
        FeatureBounds::Lower {
            expected_min,
            caution_min,
        } => {
            if value >= expected_min {
                RiskZone::Expected
            } else if value >= caution_min {
                RiskZone::Caution
            } else {
                RiskZone::Critical
            }
        }
        FeatureBounds::Upper {
            expected_max,
            caution_max,
        } => {
            if value <= expected_max {
                RiskZone::Expected
            } else if value <= caution_max {
                RiskZone::Caution
            } else {
                RiskZone::Critical
            }
        }
    }
}
