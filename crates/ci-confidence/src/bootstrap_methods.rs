//! Bootstrap interval construction methods
//!
//! Each method turns a bootstrap distribution and the full-sample point
//! estimate into a confidence interval. Quantiles use linear interpolation
//! between order statistics at position `q · (B - 1)`.

use crate::{ConfidenceInterval, ConfidenceLevel};
use ci_core::{math::distributions::normal, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// Bootstrap method for calculating confidence intervals
pub trait BootstrapMethod: Send + Sync {
    /// Calculate confidence interval from bootstrap distribution
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval>;

    /// Method name for documentation
    fn name(&self) -> &'static str;
}

/// Quantile of sorted data by linear interpolation
///
/// `q` is clamped to `[0, 1]`; empty input yields NaN.
pub fn quantile_linear_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        len => {
            let pos = q.clamp(0.0, 1.0) * (len - 1) as f64;
            let i = pos.floor() as usize;
            let j = pos.ceil() as usize;
            let t = pos - i as f64;
            if i == j {
                sorted[i]
            } else {
                (1.0 - t) * sorted[i] + t * sorted[j]
            }
        }
    }
}

fn sorted_estimates(bootstrap_estimates: &[f64]) -> Result<Vec<f64>> {
    if bootstrap_estimates.is_empty() {
        return Err(Error::InvalidInput("No bootstrap estimates".to_string()));
    }
    let mut sorted = bootstrap_estimates.to_vec();
    crate::bootstrap::sort_f64(&mut sorted);
    Ok(sorted)
}

/// Percentile bootstrap method
///
/// `[q(α/2), q(1 - α/2)]` of the bootstrap distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentileBootstrap;

impl BootstrapMethod for PercentileBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        let sorted = sorted_estimates(bootstrap_estimates)?;
        let tail = level.tail_probability();
        Ok(ConfidenceInterval::new(
            quantile_linear_sorted(&sorted, tail),
            quantile_linear_sorted(&sorted, 1.0 - tail),
            original_estimate,
            level.value(),
        ))
    }

    fn name(&self) -> &'static str {
        "Percentile Bootstrap"
    }
}

/// Basic bootstrap method
///
/// Reflects the percentile bounds around the point estimate:
/// `[2θ̂ - q(1 - α/2), 2θ̂ - q(α/2)]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicBootstrap;

impl BootstrapMethod for BasicBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        let sorted = sorted_estimates(bootstrap_estimates)?;
        let tail = level.tail_probability();
        let lower = 2.0 * original_estimate - quantile_linear_sorted(&sorted, 1.0 - tail);
        let upper = 2.0 * original_estimate - quantile_linear_sorted(&sorted, tail);
        Ok(ConfidenceInterval::new(lower, upper, original_estimate, level.value()))
    }

    fn name(&self) -> &'static str {
        "Basic Bootstrap"
    }
}

/// Normal bootstrap method
///
/// `θ̂ ± z · sd*`, with `sd*` the standard deviation of the bootstrap
/// distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalBootstrap;

impl BootstrapMethod for NormalBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        if bootstrap_estimates.len() < 2 {
            return Err(Error::InvalidInput(
                "Normal bootstrap needs at least 2 estimates".to_string(),
            ));
        }
        let n = bootstrap_estimates.len() as f64;
        let mean = bootstrap_estimates.iter().sum::<f64>() / n;
        let variance = bootstrap_estimates
            .iter()
            .map(|&x| (x - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        crate::asymptotic::normal_approx(original_estimate, variance, level, None)
    }

    fn name(&self) -> &'static str {
        "Normal Bootstrap"
    }
}

/// Intermediate quantities of a BCa interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BcaDiagnostics {
    /// Bias correction
    pub z0: f64,
    pub acceleration: f64,
    /// Adjusted lower-tail probability
    pub alpha_low_adj: f64,
    /// Adjusted upper-tail probability
    pub alpha_high_adj: f64,
    pub n_bootstrap: usize,
    pub n_jackknife: usize,
}

/// A BCa interval, or the percentile interval it fell back to
#[derive(Debug, Clone, PartialEq)]
pub struct BcaOutcome {
    pub interval: ConfidenceInterval,
    /// Present when the BCa adjustment was applied
    pub diagnostics: Option<BcaDiagnostics>,
    /// Why the adjustment was undefined, when it was
    pub fallback_reason: Option<String>,
}

/// BCa (bias-corrected and accelerated) bootstrap method
///
/// The bias correction is `z0 = Φ⁻¹((#{θ* < θ̂} + ½ #{θ* = θ̂}) / B)`. The
/// acceleration comes from the skewness of the jackknife values:
/// `a = Σ(θ̄ - θᵢ)³ / (6 (Σ(θ̄ - θᵢ)²)^{3/2})`. The percentile cut points
/// become `Φ(z0 + (z0 + z) / (1 - a (z0 + z)))`.
///
/// When either quantity is undefined (a bootstrap distribution entirely on
/// one side of θ̂, zero spread in the bootstrap or jackknife values, or
/// fewer than three jackknife values) the percentile interval is returned
/// and the reason recorded.
#[derive(Debug, Clone, Default)]
pub struct BCaBootstrap {
    jackknife: Vec<f64>,
}

impl BCaBootstrap {
    pub fn new(jackknife: Vec<f64>) -> Self {
        Self { jackknife }
    }

    fn bias_correction(sorted: &[f64], original_estimate: f64) -> std::result::Result<f64, String> {
        let n_lt = sorted.partition_point(|&x| x < original_estimate);
        let n_le = sorted.partition_point(|&x| x <= original_estimate);
        let proportion = (n_lt as f64 + 0.5 * (n_le - n_lt) as f64) / sorted.len() as f64;
        let z0 = normal::ppf(proportion);
        if z0.is_finite() {
            Ok(z0)
        } else {
            Err(format!(
                "bias correction undefined: {:.4} of the bootstrap distribution lies below the estimate",
                proportion
            ))
        }
    }

    fn acceleration(&self) -> std::result::Result<f64, String> {
        if self.jackknife.len() < 3 {
            return Err(format!(
                "only {} usable jackknife values",
                self.jackknife.len()
            ));
        }
        let mean = self.jackknife.iter().sum::<f64>() / self.jackknife.len() as f64;
        let (sum2, sum3) = self.jackknife.iter().fold((0.0_f64, 0.0_f64), |(s2, s3), &v| {
            let d = mean - v;
            (s2 + d * d, s3 + d * d * d)
        });
        if !(sum2.is_finite() && sum2 > 0.0) {
            return Err("jackknife values have zero variance".to_string());
        }
        let a = sum3 / (6.0 * sum2.powf(1.5));
        if a.is_finite() {
            Ok(a)
        } else {
            Err("acceleration is non-finite".to_string())
        }
    }

    fn adjusted_alpha(alpha: f64, z0: f64, acceleration: f64) -> f64 {
        let z = normal::ppf(alpha);
        let shifted = z0 + z;
        normal::cdf(z0 + shifted / (1.0 - acceleration * shifted))
    }

    /// BCa interval plus the quantities it was built from
    #[instrument(skip(self, bootstrap_estimates), fields(n_estimates = bootstrap_estimates.len(), n_jackknife = self.jackknife.len()))]
    pub fn calculate_with_diagnostics(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<BcaOutcome> {
        let sorted = sorted_estimates(bootstrap_estimates)?;

        let adjustment = if sorted[0] == sorted[sorted.len() - 1] {
            Err("bootstrap distribution has zero variance".to_string())
        } else {
            Self::bias_correction(&sorted, original_estimate)
                .and_then(|z0| self.acceleration().map(|a| (z0, a)))
        };

        let (z0, acceleration) = match adjustment {
            Ok(pair) => pair,
            Err(reason) => {
                warn!(%reason, "BCa adjustment undefined, falling back to percentile");
                let interval =
                    PercentileBootstrap.calculate_interval(&sorted, original_estimate, level)?;
                return Ok(BcaOutcome {
                    interval,
                    diagnostics: None,
                    fallback_reason: Some(reason),
                });
            }
        };

        let tail = level.tail_probability();
        let alpha_low_adj = Self::adjusted_alpha(tail, z0, acceleration);
        let alpha_high_adj = Self::adjusted_alpha(1.0 - tail, z0, acceleration);
        debug!(z0, acceleration, alpha_low_adj, alpha_high_adj, "BCa parameters");

        let lo = quantile_linear_sorted(&sorted, alpha_low_adj);
        let hi = quantile_linear_sorted(&sorted, alpha_high_adj);

        Ok(BcaOutcome {
            interval: ConfidenceInterval::new(lo.min(hi), lo.max(hi), original_estimate, level.value()),
            diagnostics: Some(BcaDiagnostics {
                z0,
                acceleration,
                alpha_low_adj,
                alpha_high_adj,
                n_bootstrap: sorted.len(),
                n_jackknife: self.jackknife.len(),
            }),
            fallback_reason: None,
        })
    }
}

impl BootstrapMethod for BCaBootstrap {
    fn calculate_interval(
        &self,
        bootstrap_estimates: &[f64],
        original_estimate: f64,
        level: ConfidenceLevel,
    ) -> Result<ConfidenceInterval> {
        Ok(self
            .calculate_with_diagnostics(bootstrap_estimates, original_estimate, level)?
            .interval)
    }

    fn name(&self) -> &'static str {
        "BCa Bootstrap"
    }
}
