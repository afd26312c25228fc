//! Error types for Drift Triage.
//!
//! Analytical stages never fail on expected degenerate input; errors exist
//! only at the boundaries that feed them: configuration loading, state
//! construction, and pipeline input validation. Error codes are stable and
//! grouped by category for machine parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Drift Triage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration errors (bounds, weights, hypotheses, aggregation spec).
    Config,
    /// State-table construction and validation errors.
    State,
    /// File I/O and deserialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::State => write!(f, "state"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Drift Triage.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid bounds for feature '{feature}': {message}")]
    InvalidBounds { feature: String, message: String },

    #[error("invalid hypothesis '{name}': {message}")]
    InvalidHypothesis { name: String, message: String },

    #[error("unsupported aggregation '{kind}' for feature '{feature}'")]
    UnknownAggregation { feature: String, kind: String },

    // State errors (20-29)
    #[error("feature '{feature}' not present in state table")]
    MissingFeature { feature: String },

    #[error("timestamps out of order at row {index}")]
    UnorderedTimestamps { index: usize },

    #[error("row {index} does not share the table feature set")]
    InconsistentFeatures { index: usize },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: State errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidBounds { .. } => 11,
            Error::InvalidHypothesis { .. } => 12,
            Error::UnknownAggregation { .. } => 13,
            Error::MissingFeature { .. } => 20,
            Error::UnorderedTimestamps { .. } => 21,
            Error::InconsistentFeatures { .. } => 22,
            Error::Io(_) => 60,
            Error::Yaml(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::InvalidBounds { .. }
            | Error::InvalidHypothesis { .. }
            | Error::UnknownAggregation { .. } => ErrorCategory::Config,

            Error::MissingFeature { .. }
            | Error::UnorderedTimestamps { .. }
            | Error::InconsistentFeatures { .. } => ErrorCategory::State,

            Error::Io(_) | Error::Yaml(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller.
    ///
    /// Config and I/O errors are recoverable by fixing the offending file;
    /// state errors require regenerating the input table.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_)
            | Error::InvalidBounds { .. }
            | Error::InvalidHypothesis { .. }
            | Error::UnknownAggregation { .. } => true,

            Error::MissingFeature { .. } => true,
            Error::UnorderedTimestamps { .. } => false,
            Error::InconsistentFeatures { .. } => false,

            Error::Io(_) | Error::Yaml(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(
            Error::InvalidBounds {
                feature: "lead_time".into(),
                message: "m".into()
            }
            .code(),
            11
        );
        assert_eq!(
            Error::MissingFeature {
                feature: "dau".into()
            }
            .code(),
            20
        );
        assert_eq!(Error::UnorderedTimestamps { index: 3 }.code(), 21);
    }

    #[test]
    fn error_categories_group_correctly() {
        assert_eq!(
            Error::UnknownAggregation {
                feature: "dau".into(),
                kind: "median".into()
            }
            .category(),
            ErrorCategory::Config
        );
        assert_eq!(
            Error::InconsistentFeatures { index: 0 }.category(),
            ErrorCategory::State
        );
    }

    #[test]
    fn recoverability_hints() {
        assert!(Error::Config("x".into()).is_recoverable());
        assert!(!Error::UnorderedTimestamps { index: 1 }.is_recoverable());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::UnknownAggregation {
            feature: "orders".into(),
            kind: "median".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("median"));
        assert!(msg.contains("orders"));
    }

    #[test]
    fn category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::State.to_string(), "state");
        assert_eq!(ErrorCategory::Io.to_string(), "io");
    }
}
