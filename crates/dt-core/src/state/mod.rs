//! System-state construction: from raw events to the regular table the
//! analytical stages consume.

pub mod builder;

pub use builder::{build_state_table, RawEvent};
pub use dt_common::{Observation, StateTable};
