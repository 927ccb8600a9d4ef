//! Closed-form intervals: normal approximation and binomial proportions

use crate::{ConfidenceInterval, ConfidenceLevel, EstimationMethod};
use ci_core::math::distributions::{beta, normal};
use ci_core::{Error, Result};
use tracing::debug;

/// `point ± z · sqrt(variance)`, optionally clipped to the metric's range
///
/// # Errors
/// `Error::InvalidParameter` for a negative or non-finite variance.
pub fn normal_approx(
    point: f64,
    variance: f64,
    level: ConfidenceLevel,
    range: Option<(f64, f64)>,
) -> Result<ConfidenceInterval> {
    if !variance.is_finite() || variance < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "Variance must be finite and non-negative, got {variance}"
        )));
    }
    let z = normal::two_sided_critical(level.value());
    let margin = z * variance.sqrt();
    let ci = ConfidenceInterval::new(point - margin, point + margin, point, level.value());
    Ok(match range {
        Some(r) => ci.clipped(r),
        None => ci,
    })
}

/// Interval for a binomial proportion `successes / trials`
///
/// `NormalApprox` is the Wald interval. Wilson, Agresti-Coull,
/// Clopper-Pearson and Jeffreys follow their textbook definitions. Bounds
/// always lie in `[0, 1]`.
///
/// # Errors
/// - `Error::DegenerateInput` if `trials` is zero
/// - `Error::InvalidInput` if `successes > trials`
/// - `Error::UnsupportedMethod` for DeLong or bootstrap methods
pub fn proportion_confint(
    successes: usize,
    trials: usize,
    level: ConfidenceLevel,
    method: EstimationMethod,
) -> Result<ConfidenceInterval> {
    if trials == 0 {
        return Err(Error::DegenerateInput(
            "Proportion has no trials".to_string(),
        ));
    }
    if successes > trials {
        return Err(Error::InvalidInput(format!(
            "Successes ({successes}) exceed trials ({trials})"
        )));
    }

    let x = successes as f64;
    let n = trials as f64;
    let p = x / n;
    let alpha = level.alpha();
    let z = normal::two_sided_critical(level.value());

    let (lower, upper) = match method {
        EstimationMethod::NormalApprox => {
            let margin = z * (p * (1.0 - p) / n).sqrt();
            (p - margin, p + margin)
        }
        EstimationMethod::Wilson => {
            let z2 = z * z;
            let denom = 1.0 + z2 / n;
            let center = (p + z2 / (2.0 * n)) / denom;
            let half = z / denom * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();
            (center - half, center + half)
        }
        EstimationMethod::AgrestiCoull => {
            let z2 = z * z;
            let n_adj = n + z2;
            let p_adj = (x + z2 / 2.0) / n_adj;
            let margin = z * (p_adj * (1.0 - p_adj) / n_adj).sqrt();
            (p_adj - margin, p_adj + margin)
        }
        EstimationMethod::ClopperPearson => {
            let lower = if successes == 0 {
                0.0
            } else {
                beta::quantile(x, n - x + 1.0, alpha / 2.0)?
            };
            let upper = if successes == trials {
                1.0
            } else {
                beta::quantile(x + 1.0, n - x, 1.0 - alpha / 2.0)?
            };
            (lower, upper)
        }
        EstimationMethod::Jeffreys => (
            beta::quantile(x + 0.5, n - x + 0.5, alpha / 2.0)?,
            beta::quantile(x + 0.5, n - x + 0.5, 1.0 - alpha / 2.0)?,
        ),
        other => {
            return Err(Error::UnsupportedMethod(format!(
                "{other} does not produce a binomial proportion interval"
            )))
        }
    };

    debug!(successes, trials, %method, lower, upper, "proportion interval");
    Ok(ConfidenceInterval::new(lower, upper, p, level.value()).clipped((0.0, 1.0)))
}
