//! Drift Triage Core Library
//!
//! This library turns a time-indexed table of operational metrics into a
//! statistically grounded anomaly verdict, a ranked set of causal
//! explanations, and scalar confidence metrics:
//! - Windowed multivariate anomaly assessment with a decision gate
//! - Directional signal extraction against a historical baseline
//! - Bayesian hypothesis ranking over configured explanations
//! - Information-theoretic confidence scoring of the ranked distribution
//!
//! The stages are pure functions run strictly in sequence per window; the
//! gate decides whether anything beyond the assessment runs at all.

pub mod anomaly;
pub mod confidence;
pub mod hypotheses;
pub mod logging;
pub mod narrative;
pub mod pipeline;
pub mod signals;
pub mod state;

pub use anomaly::{AnomalyLevel, DecisionGate, DistanceSummary, RiskZone, SignalScores, Stage1Result};
pub use confidence::{confidence_metrics, ConfidenceMetricsResult};
pub use hypotheses::{rank_hypotheses, Hypothesis, LikelihoodModel, LikelihoodRule, RankedHypothesis};
pub use narrative::NarrativeFacts;
pub use pipeline::PipelineOutcome;
pub use signals::{extract_signals, DirectionalSignal, SignalMap};
