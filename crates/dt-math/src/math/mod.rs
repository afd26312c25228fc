//! Core math modules.

pub mod chisq;
pub mod entropy;
pub mod linalg;
pub mod stable;
