//! Stage 2: directional signal extraction against a historical baseline.
//!
//! Only runs when Stage 1's gate says proceed. Each monitored feature's
//! window mean is compared against the mean and spread of a short baseline
//! taken immediately before the window; the result is a ternary direction
//! plus a bounded strength, deliberately coarse so hypothesis matching stays
//! explainable.

use std::collections::BTreeMap;

use dt_common::{Direction, Observation, StateTable};
use dt_math::round3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::anomaly::Stage1Result;

/// |z| below this is noise: direction flat.
const FLAT_Z: f64 = 0.5;

/// |z| at which strength saturates at 1.0.
const STRENGTH_SATURATION_Z: f64 = 3.0;

/// Direction and bounded strength of one feature's deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DirectionalSignal {
    pub direction: Direction,
    /// min(|z| / 3, 1): a three-sigma move saturates.
    pub strength: f64,
}

/// Signals keyed by feature name. Features with a degenerate baseline are
/// absent, not zeroed.
pub type SignalMap = BTreeMap<String, DirectionalSignal>;

/// Extract per-feature directional signals for the Stage 1 window.
///
/// The baseline is the `baseline_len` most recent rows strictly before the
/// window start. Features whose baseline standard deviation is zero or
/// undefined (fewer than 2 baseline rows) are omitted from the result.
pub fn extract_signals(
    table: &StateTable,
    stage1: &Stage1Result,
    features: &[String],
    baseline_len: usize,
) -> SignalMap {
    let window = table.window(stage1.window_start, stage1.window_end);
    let baseline = table.tail_before(stage1.window_start, baseline_len);

    let mut signals = SignalMap::new();
    for feature in features {
        let window_mean = feature_mean(window, feature);
        let baseline_mean = feature_mean(baseline, feature);
        let baseline_std = feature_sample_std(baseline, feature);

        // NaN (undefined) and exact zero both fail this test
        if !(baseline_std > 0.0) {
            continue;
        }

        let z = (window_mean - baseline_mean) / baseline_std;
        let direction = if z.abs() < FLAT_Z {
            Direction::Flat
        } else if z > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        };
        let strength = round3((z.abs() / STRENGTH_SATURATION_Z).min(1.0));

        signals.insert(feature.clone(), DirectionalSignal { direction, strength });
    }
    signals
}

fn feature_mean(rows: &[Observation], feature: &str) -> f64 {
    if rows.is_empty() {
        return f64::NAN;
    }
    rows.iter().map(|obs| obs.value(feature)).sum::<f64>() / rows.len() as f64
}

/// Sample standard deviation (denominator n-1); NaN for fewer than 2 rows.
fn feature_sample_std(rows: &[Observation], feature: &str) -> f64 {
    if rows.len() < 2 {
        return f64::NAN;
    }
    let mean = feature_mean(rows, feature);
    let sum_sq: f64 = rows
        .iter()
        .map(|obs| {
            let d = obs.value(feature) - mean;
            d * d
        })
        .sum();
    (sum_sq / (rows.len() - 1) as f64).sqrt()
}
