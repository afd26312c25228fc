//! Drift Triage configuration: model, YAML loading, fail-fast validation.
//!
//! Configuration errors (malformed bounds, invalid significance level,
//! unknown aggregation kinds, missing columns) are caught here with
//! descriptive errors before anything reaches the analytical stages; the
//! stages assume validated inputs.

pub mod bounds;
pub mod hypotheses;
pub mod pipeline;
pub mod state;
mod validate;

pub use bounds::FeatureBounds;
pub use hypotheses::HypothesisConfig;
pub use pipeline::{PipelineConfig, SignalWeights};
pub use state::{Aggregation, StateSpec, TimeUnit};
