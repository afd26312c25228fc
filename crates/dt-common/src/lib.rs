//! Drift Triage shared types and errors.
//!
//! This crate provides the foundational pieces shared across dt-* crates:
//! - The time-ordered state table and its invariants
//! - The ternary direction type used by signals and hypothesis profiles
//! - The unified error type with stable codes

pub mod error;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::{Direction, Observation, StateTable};
