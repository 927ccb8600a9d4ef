//! Confidence intervals for the ROC AUC
//!
//! DeLong's analytic variance is the default. Any bootstrap method is
//! available too, resampling scores, labels and weights together.

use crate::api::{config_rng, estimate_sample_ci_with_rng};
use crate::asymptotic::normal_approx;
use crate::{EstimationConfig, EstimationMethod, MetricEstimate};
use ci_core::{Error, Metric, MetricParams, PairedSample, Result};
use ci_rank::{auc_point_estimate, delong_auc_variance, ClassSplit};
use rand::Rng;
use tracing::{debug, instrument};

/// ROC AUC as a black-box metric over `(y_true, y_score)`
///
/// Undefined (`DegenerateInput`) when either class is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RocAuc;

impl Metric for RocAuc {
    fn evaluate(&self, y_true: &[f64], y_score: &[f64], _params: &MetricParams) -> Result<f64> {
        auc_point_estimate(y_true, y_score, None)
    }

    fn evaluate_weighted(
        &self,
        y_true: &[f64],
        y_score: &[f64],
        sample_weight: &[f64],
        _params: &MetricParams,
    ) -> Result<f64> {
        auc_point_estimate(y_true, y_score, Some(sample_weight))
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        Some((0.0, 1.0))
    }

    fn name(&self) -> &str {
        "roc_auc"
    }
}

/// Point estimate and confidence interval for the ROC AUC
///
/// `Delong` and `NormalApprox` both use the DeLong variance with a normal
/// approximation; the interval is clipped to `[0, 1]`. Bootstrap methods
/// treat [`RocAuc`] as a black-box metric.
///
/// # Errors
/// - `Error::InputShape` for empty or mismatched inputs
/// - `Error::InvalidInput` for labels outside {0, 1}, NaN scores or bad weights
/// - `Error::DegenerateInput` if a class is missing (or, for DeLong, has
///   fewer than two members)
/// - `Error::UnsupportedMethod` for binomial-proportion methods
pub fn estimate_auc_ci(
    y_true: &[f64],
    y_score: &[f64],
    sample_weight: Option<&[f64]>,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    estimate_auc_ci_with_rng(y_true, y_score, sample_weight, config, &mut config_rng(config))
}

/// [`estimate_auc_ci`] drawing bootstrap seeds from `rng`
#[instrument(skip(y_true, y_score, sample_weight, rng), fields(n = y_true.len(), weighted = sample_weight.is_some()))]
pub fn estimate_auc_ci_with_rng<R: Rng + ?Sized>(
    y_true: &[f64],
    y_score: &[f64],
    sample_weight: Option<&[f64]>,
    config: &EstimationConfig,
    rng: &mut R,
) -> Result<MetricEstimate> {
    let level = config.validate()?;
    let method = config.method_or(EstimationMethod::Delong);

    match method {
        EstimationMethod::Delong | EstimationMethod::NormalApprox => {
            let split = ClassSplit::from_labels(y_true, y_score, sample_weight)?;
            let est = delong_auc_variance(&split)?;
            debug!(auc = est.auc, variance = est.variance, "DeLong estimate");
            Ok(MetricEstimate {
                estimate: est.auc,
                interval: normal_approx(est.auc, est.variance, level, RocAuc.value_range())?,
                method,
                warnings: Vec::new(),
                n_valid_resamples: None,
            })
        }
        m if m.is_bootstrap() => {
            let sample = PairedSample::new(y_true, y_score)?.with_weights(sample_weight)?;
            // Validates labels before any resampling
            ClassSplit::from_labels(y_true, y_score, sample_weight)?;
            let config = config.clone().with_method(m);
            estimate_sample_ci_with_rng(&sample, &RocAuc, &MetricParams::new(), &config, rng)
        }
        other => Err(Error::UnsupportedMethod(format!(
            "{other} does not apply to ROC AUC"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const Y_TRUE: [f64; 9] = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
    const Y_SCORE: [f64; 9] = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];

    #[test]
    fn test_delong_interval() {
        let result = estimate_auc_ci(&Y_TRUE, &Y_SCORE, None, &EstimationConfig::default()).unwrap();
        assert_eq!(result.method, EstimationMethod::Delong);
        assert_abs_diff_eq!(result.estimate, 0.775, epsilon = 1e-12);

        let margin = 1.959964 * 0.025625_f64.sqrt();
        assert_abs_diff_eq!(result.interval.lower, 0.775 - margin, epsilon = 1e-5);
        assert_eq!(result.interval.upper, 1.0);
        assert!(result.n_valid_resamples.is_none());
    }

    #[test]
    fn test_normal_approx_matches_delong() {
        let delong = estimate_auc_ci(&Y_TRUE, &Y_SCORE, None, &EstimationConfig::default()).unwrap();
        let normal = estimate_auc_ci(
            &Y_TRUE,
            &Y_SCORE,
            None,
            &EstimationConfig::new().with_method(EstimationMethod::NormalApprox),
        )
        .unwrap();
        assert_eq!(delong.interval, normal.interval);
    }

    #[test]
    fn test_perfect_separation_collapses() {
        let y_true = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let y_score = [0.1, 0.2, 0.3, 0.7, 0.8, 0.9];
        let (point, (lower, upper)) = estimate_auc_ci(&y_true, &y_score, None, &EstimationConfig::default())
            .unwrap()
            .as_tuple();
        assert_eq!((point, lower, upper), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_bootstrap_interval_brackets_point() {
        let config = EstimationConfig::new()
            .with_method(EstimationMethod::BootstrapPercentile)
            .with_resamples(500);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let result = estimate_auc_ci_with_rng(&Y_TRUE, &Y_SCORE, None, &config, &mut rng).unwrap();
        assert_abs_diff_eq!(result.estimate, 0.775, epsilon = 1e-12);
        assert!(result.interval.lower >= 0.0 && result.interval.upper <= 1.0);
        assert!(result.interval.lower < 0.775 && result.interval.upper >= 0.775);
        // resamples missing a class are excluded, not fatal
        assert!(result.n_valid_resamples.unwrap() <= 500);
    }

    #[test]
    fn test_weighted_bootstrap() {
        let weights = [1.0, 2.0, 1.0, 1.0, 0.5, 1.0, 2.0, 1.0, 1.0];
        let config = EstimationConfig::new()
            .with_method(EstimationMethod::BootstrapBca)
            .with_resamples(300)
            .with_seed(5);
        let weighted = estimate_auc_ci(&Y_TRUE, &Y_SCORE, Some(&weights[..]), &config).unwrap();
        let expected = auc_point_estimate(&Y_TRUE, &Y_SCORE, Some(&weights[..])).unwrap();
        assert_abs_diff_eq!(weighted.estimate, expected, epsilon = 1e-12);
        assert!(weighted.interval.lower <= weighted.interval.upper);
    }

    #[test]
    fn test_errors() {
        let config = EstimationConfig::default();
        assert!(matches!(
            estimate_auc_ci(&[0.0, 0.0, 0.0], &[0.1, 0.2, 0.3], None, &config),
            Err(Error::DegenerateInput(_))
        ));
        assert!(matches!(
            estimate_auc_ci(&[0.0, 2.0], &[0.1, 0.2], None, &config),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            estimate_auc_ci(&[0.0, 1.0], &[0.1], None, &config),
            Err(Error::InputShape(_))
        ));
        assert!(matches!(
            estimate_auc_ci(&Y_TRUE, &Y_SCORE, None, &config.clone().with_method(EstimationMethod::Wilson)),
            Err(Error::UnsupportedMethod(_))
        ));
        assert!(matches!(
            estimate_auc_ci(
                &[0.0, 2.0],
                &[0.1, 0.2],
                None,
                &config.with_method(EstimationMethod::BootstrapPercentile).with_resamples(5)
            ),
            Err(Error::InvalidInput(_))
        ));
    }
}
