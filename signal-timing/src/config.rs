//! Optimizer configuration types
//!
//! The DAT decoder takes no configuration. The offset optimizer exposes the
//! few knobs of its search: sweep resolution, how many candidates each
//! scenario keeps, the forward/reverse blend weights and whether scoring runs
//! on the rayon pool.

use crate::types::{Result, SignalTimingError};
use serde::{Deserialize, Serialize};

/// Configuration for the offset optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Departure-time sweep step in seconds (default: 0.5)
    #[serde(default = "default_resolution")]
    pub resolution_s: f64,

    /// Candidates kept per scenario (default: 3)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Interpolation weights between the forward and reverse offsets
    #[serde(default = "default_blend_weights")]
    pub blend_weights: Vec<f64>,

    /// Score candidates in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_resolution() -> f64 {
    0.5
}

fn default_top_n() -> usize {
    3
}

fn default_blend_weights() -> Vec<f64> {
    vec![0.25, 0.5, 0.75]
}

fn default_true() -> bool {
    true
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            resolution_s: default_resolution(),
            top_n: default_top_n(),
            blend_weights: default_blend_weights(),
            parallel: default_true(),
        }
    }
}

impl OptimizerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the sweep resolution
    pub fn with_resolution(mut self, seconds: f64) -> Self {
        self.resolution_s = seconds;
        self
    }

    /// Builder method: set how many candidates each scenario keeps
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Builder method: replace the blend weights
    pub fn with_blend_weights(mut self, weights: Vec<f64>) -> Self {
        self.blend_weights = weights;
        self
    }

    /// Builder method: enable or disable parallel scoring
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Check the settings before a search
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution_s.is_finite() && self.resolution_s > 0.0) {
            return Err(SignalTimingError::InvalidConfig(format!(
                "resolution_s must be positive, got {}",
                self.resolution_s
            )));
        }
        if self.top_n == 0 {
            return Err(SignalTimingError::InvalidConfig("top_n must be at least 1".to_string()));
        }
        if let Some(w) = self.blend_weights.iter().find(|w| !(0.0..=1.0).contains(*w)) {
            return Err(SignalTimingError::InvalidConfig(format!(
                "blend weight {} is outside [0, 1]",
                w
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_config_defaults() {
        let config = OptimizerConfig::new();
        assert_eq!(config.resolution_s, 0.5);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.blend_weights, vec![0.25, 0.5, 0.75]);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optimizer_config_builder() {
        let config = OptimizerConfig::new()
            .with_resolution(1.0)
            .with_top_n(5)
            .with_blend_weights(vec![0.5])
            .with_parallel(false);

        assert_eq!(config.resolution_s, 1.0);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.blend_weights, vec![0.5]);
        assert!(!config.parallel);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(OptimizerConfig::new().with_resolution(0.0).validate().is_err());
        assert!(OptimizerConfig::new().with_resolution(f64::NAN).validate().is_err());
        assert!(OptimizerConfig::new().with_top_n(0).validate().is_err());
        assert!(OptimizerConfig::new().with_blend_weights(vec![0.5, 1.5]).validate().is_err());
        assert!(OptimizerConfig::new().with_blend_weights(vec![]).validate().is_ok());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: OptimizerConfig = serde_json::from_str(r#"{"top_n": 1}"#).unwrap();
        assert_eq!(config.top_n, 1);
        assert_eq!(config.resolution_s, 0.5);
        assert_eq!(config.blend_weights.len(), 3);
    }
}
