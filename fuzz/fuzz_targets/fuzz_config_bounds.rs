//! Fuzz target for the directional bounds deserializer.
//!
//! The exactly-one-key-pair rule is enforced in a custom Deserialize impl;
//! arbitrary YAML must never panic it.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = serde_yaml::from_str::<dt_config::FeatureBounds>(text);
    }
});
