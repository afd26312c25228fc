//! Fuzz target for pipeline YAML configuration parsing.
//!
//! Parsing plus validation must handle arbitrary input without panicking,
//! only returning errors.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = dt_config::PipelineConfig::from_yaml_str(text);
    }
});
