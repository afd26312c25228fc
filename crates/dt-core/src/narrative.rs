//! Structured facts for the narrative consumer.
//!
//! The core supplies facts, never prose: an external renderer (template or
//! LLM backed) turns these records into text. On a stopped run only the
//! verdict and a reason are handed over; on a proceed the full assessment,
//! the signal map, the ranked hypotheses, and the confidence metrics are.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyLevel, Stage1Result};
use crate::confidence::ConfidenceMetricsResult;
use crate::hypotheses::RankedHypothesis;
use crate::pipeline::PipelineOutcome;
use crate::signals::SignalMap;

const DEFAULT_STOP_REASON: &str = "no significant anomaly detected";

/// Everything the narrative collaborator may say, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NarrativeFacts {
    /// The gate stopped the pipeline; nothing to explain.
    Stop {
        anomaly_level: AnomalyLevel,
        reason: String,
    },
    /// Full explanation hand-off. `hypotheses` is the complete ranked
    /// list, descending, so the consumer always has at least the top two
    /// when two were configured.
    Proceed {
        assessment: Stage1Result,
        signals: SignalMap,
        hypotheses: Vec<RankedHypothesis>,
        confidence: ConfidenceMetricsResult,
    },
}

impl NarrativeFacts {
    /// Assemble the hand-off from a pipeline outcome.
    pub fn from_outcome(outcome: &PipelineOutcome) -> Self {
        match (&outcome.signals, &outcome.hypotheses, &outcome.confidence) {
            (Some(signals), Some(hypotheses), Some(confidence)) => NarrativeFacts::Proceed {
                assessment: outcome.stage1.clone(),
                signals: signals.clone(),
                hypotheses: hypotheses.clone(),
                confidence: *confidence,
            },
            _ => NarrativeFacts::Stop {
                anomaly_level: outcome.stage1.anomaly_level,
                reason: outcome
                    .stage1
                    .reason
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STOP_REASON.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{DecisionGate, DistanceSummary, SignalScores};
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    fn stopped_stage1(reason: Option<&str>) -> Stage1Result {
        Stage1Result {
            window_start: NaiveDateTime::default(),
            window_end: NaiveDateTime::default(),
            anomaly_level: AnomalyLevel::Marginal,
            risk_score: 0.25,
            decision_gate: DecisionGate::Stop,
            distance_summary: DistanceSummary::default(),
            signals: SignalScores::default(),
            risk_zone_hits: BTreeMap::new(),
            reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn stop_uses_stage1_reason_when_present() {
        let outcome = PipelineOutcome {
            stage1: stopped_stage1(Some("insufficient data in analysis window")),
            signals: None,
            hypotheses: None,
            confidence: None,
        };
        match NarrativeFacts::from_outcome(&outcome) {
            NarrativeFacts::Stop { anomaly_level, reason } => {
                assert_eq!(anomaly_level, AnomalyLevel::Marginal);
                assert_eq!(reason, "insufficient data in analysis window");
            }
            _ => panic!("expected stop"),
        }
    }

    #[test]
    fn stop_falls_back_to_default_reason() {
        let outcome = PipelineOutcome {
            stage1: stopped_stage1(None),
            signals: None,
            hypotheses: None,
            confidence: None,
        };
        match NarrativeFacts::from_outcome(&outcome) {
            NarrativeFacts::Stop { reason, .. } => {
                assert_eq!(reason, "no significant anomaly detected");
            }
            _ => panic!("expected stop"),
        }
    }

    #[test]
    fn facts_serialize_with_status_tag() {
        let outcome = PipelineOutcome {
            stage1: stopped_stage1(None),
            signals: None,
            hypotheses: None,
            confidence: None,
        };
        let json = serde_json::to_string(&NarrativeFacts::from_outcome(&outcome)).unwrap();
        assert!(json.contains(r#""status":"stop""#));
        assert!(json.contains(r#""anomaly_level":"marginal""#));
    }
}
