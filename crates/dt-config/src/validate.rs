//! Fail-fast validation of the assembled configuration.

use std::collections::BTreeSet;

use dt_common::{Error, Result};

use crate::pipeline::PipelineConfig;

impl PipelineConfig {
    /// Validate every field the analytical stages will rely on.
    ///
    /// Called automatically by the loaders; callers constructing a config in
    /// code should invoke it before handing the config to the pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(Error::Config(
                "at least one monitored feature is required".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for feature in &self.features {
            if !seen.insert(feature.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate monitored feature '{feature}'"
                )));
            }
        }

        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::Config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }

        if self.window_days < 1 {
            return Err(Error::Config(format!(
                "window_days must be at least 1, got {}",
                self.window_days
            )));
        }

        if self.baseline_len < 1 {
            return Err(Error::Config(
                "baseline_len must be at least 1".to_string(),
            ));
        }

        for (label, weight) in [
            ("distance", self.weights.distance),
            ("persistence", self.weights.persistence),
            ("risk_zone", self.weights.risk_zone),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::Config(format!(
                    "weight '{label}' must be finite and non-negative, got {weight}"
                )));
            }
        }

        for (feature, bounds) in &self.bounds {
            bounds.check().map_err(|message| Error::InvalidBounds {
                feature: feature.clone(),
                message,
            })?;
        }

        if self.hypotheses.is_empty() {
            return Err(Error::Config(
                "at least one hypothesis is required".to_string(),
            ));
        }
        let mut names = BTreeSet::new();
        for hypothesis in &self.hypotheses {
            if hypothesis.name.is_empty() {
                return Err(Error::InvalidHypothesis {
                    name: String::new(),
                    message: "name must not be empty".to_string(),
                });
            }
            if !names.insert(hypothesis.name.as_str()) {
                return Err(Error::InvalidHypothesis {
                    name: hypothesis.name.clone(),
                    message: "duplicate hypothesis name".to_string(),
                });
            }
            if !(0.0..=1.0).contains(&hypothesis.prior) || hypothesis.prior.is_nan() {
                return Err(Error::InvalidHypothesis {
                    name: hypothesis.name.clone(),
                    message: format!("prior must be in [0, 1], got {}", hypothesis.prior),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::bounds::FeatureBounds;
    use crate::hypotheses::HypothesisConfig;
    use crate::pipeline::{PipelineConfig, SignalWeights};
    use dt_common::{Error, ErrorCategory};
    use std::collections::BTreeMap;

    fn base() -> PipelineConfig {
        PipelineConfig {
            features: vec!["orders".to_string(), "lead_time".to_string()],
            bounds: BTreeMap::new(),
            window_days: 14,
            alpha: 0.01,
            weights: SignalWeights::default(),
            baseline_len: 30,
            hypotheses: vec![HypothesisConfig::new("demand_spike", 0.5)],
            state: None,
        }
    }

    #[test]
    fn base_config_is_valid() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn rejects_empty_features() {
        let mut config = base();
        config.features.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_features() {
        let mut config = base();
        config.features.push("orders".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let mut config = base();
            config.alpha = alpha;
            assert!(config.validate().is_err(), "alpha={alpha} should fail");
        }
    }

    #[test]
    fn rejects_zero_window() {
        let mut config = base();
        config.window_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let mut config = base();
        config.weights.persistence = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut config = base();
        config
            .bounds
            .insert("orders".to_string(), FeatureBounds::lower(700.0, 900.0));
        let err = config.validate().unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Config);
        match err {
            Error::InvalidBounds { feature, .. } => assert_eq!(feature, "orders"),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn rejects_empty_hypotheses() {
        let mut config = base();
        config.hypotheses.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_hypothesis_names() {
        let mut config = base();
        config
            .hypotheses
            .push(HypothesisConfig::new("demand_spike", 0.2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_prior_out_of_range() {
        let mut config = base();
        config.hypotheses[0].prior = 1.2;
        assert!(config.validate().is_err());
    }
}
