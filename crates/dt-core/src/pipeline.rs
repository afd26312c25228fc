//! The gated analysis pipeline.
//!
//! Strictly sequential per window: assessment, then only on a proceed gate
//! the signal extraction, hypothesis ranking, and confidence scoring. Every
//! stage is a pure function of its inputs, so independent windows can be
//! evaluated concurrently with no coordination. Input validation happens
//! once here, before any stage runs; the stages assume validated inputs.

use dt_common::{Error, Result, StateTable};
use dt_config::PipelineConfig;

use crate::anomaly::{assess_window, DecisionGate, Stage1Result};
use crate::confidence::{confidence_metrics, ConfidenceMetricsResult};
use crate::hypotheses::{rank_hypotheses, Hypothesis, RankedHypothesis};
use crate::narrative::NarrativeFacts;
use crate::signals::{extract_signals, SignalMap};

/// Output of one pipeline run. The explanation fields are populated
/// together on a proceed gate and absent together on a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    pub stage1: Stage1Result,
    pub signals: Option<SignalMap>,
    pub hypotheses: Option<Vec<RankedHypothesis>>,
    pub confidence: Option<ConfidenceMetricsResult>,
}

impl PipelineOutcome {
    pub fn proceeded(&self) -> bool {
        self.stage1.decision_gate == DecisionGate::Proceed
    }

    /// The structured hand-off for the narrative consumer.
    pub fn facts(&self) -> NarrativeFacts {
        NarrativeFacts::from_outcome(self)
    }
}

/// Run the pipeline with hypotheses built from the declarative config.
pub fn run(table: &StateTable, config: &PipelineConfig) -> Result<PipelineOutcome> {
    let hypotheses = Hypothesis::set_from_config(&config.hypotheses);
    run_with(table, config, &hypotheses)
}

/// Run the pipeline with an explicit hypothesis set, allowing bespoke
/// likelihood rules alongside declarative profiles.
pub fn run_with(
    table: &StateTable,
    config: &PipelineConfig,
    hypotheses: &[Hypothesis],
) -> Result<PipelineOutcome> {
    validate_inputs(table, config)?;

    let stage1 = assess_window(
        table,
        &config.features,
        &config.bounds,
        config.window_days,
        config.alpha,
        &config.weights,
    );
    tracing::info!(
        target: "dt_core::pipeline",
        anomaly_level = %stage1.anomaly_level,
        decision_gate = %stage1.decision_gate,
        risk_score = stage1.risk_score,
        exceedance_count = stage1.distance_summary.exceedance_count,
        "window assessed"
    );

    if stage1.decision_gate == DecisionGate::Stop {
        return Ok(PipelineOutcome {
            stage1,
            signals: None,
            hypotheses: None,
            confidence: None,
        });
    }

    let signals = extract_signals(table, &stage1, &config.features, config.baseline_len);
    tracing::debug!(
        target: "dt_core::pipeline",
        extracted = signals.len(),
        monitored = config.features.len(),
        "directional signals extracted"
    );

    let ranked = rank_hypotheses(&signals, hypotheses);
    let confidence = confidence_metrics(&ranked);
    tracing::info!(
        target: "dt_core::pipeline",
        top_hypothesis = ranked.first().map(|r| r.name.as_str()).unwrap_or("-"),
        nci = confidence.nci,
        der = confidence.der,
        cds = confidence.cds,
        "hypotheses ranked"
    );

    Ok(PipelineOutcome {
        stage1,
        signals: Some(signals),
        hypotheses: Some(ranked),
        confidence: Some(confidence),
    })
}

/// Fail fast when the configuration references features the table does not
/// carry. An empty table is exempt: it flows into the designed
/// insufficient-data stop instead of erroring.
pub fn validate_inputs(table: &StateTable, config: &PipelineConfig) -> Result<()> {
    config.validate()?;
    if table.is_empty() {
        return Ok(());
    }
    for feature in config.features.iter().chain(config.bounds.keys()) {
        if !table.has_feature(feature) {
            return Err(Error::MissingFeature {
                feature: feature.clone(),
            });
        }
    }
    Ok(())
}
