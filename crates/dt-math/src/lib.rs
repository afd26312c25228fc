//! Drift Triage math utilities.

pub mod math;

pub use math::chisq::*;
pub use math::entropy::*;
pub use math::linalg::*;
pub use math::stable::*;
