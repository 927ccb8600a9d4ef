//! Estimation configuration

use crate::method::EstimationMethod;
use crate::types::ConfidenceLevel;
use ci_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 9999;

/// Resample count for quick exploratory runs
pub const FAST_RESAMPLES: usize = 1000;

/// Resample count for publication-grade intervals
pub const HIGH_PRECISION_RESAMPLES: usize = 20000;

/// Settings shared by every interval entry point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    /// Two-sided coverage, strictly inside (0, 1)
    pub confidence_level: f64,
    /// `None` picks the metric's default method
    pub method: Option<EstimationMethod>,
    pub n_resamples: usize,
    /// `None` seeds from entropy
    pub seed: Option<u64>,
    /// Spread resamples over the Rayon pool (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            method: None,
            n_resamples: DEFAULT_RESAMPLES,
            seed: None,
            parallel: false,
        }
    }
}

impl EstimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: EstimationMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the method from its external name
    pub fn with_method_str(self, method: &str) -> Result<Self> {
        Ok(self.with_method(method.parse()?))
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolve the method against a metric default
    pub fn method_or(&self, default: EstimationMethod) -> EstimationMethod {
        self.method.unwrap_or(default)
    }

    /// Check the level and resample count
    pub fn validate(&self) -> Result<ConfidenceLevel> {
        let level = ConfidenceLevel::new(self.confidence_level)?;
        if self.n_resamples == 0 {
            return Err(Error::InvalidParameter(
                "Number of resamples must be positive".to_string(),
            ));
        }
        Ok(level)
    }
}
