//! Entry points for intervals around arbitrary metrics
//!
//! ```rust
//! use ci_confidence::{estimate_metric_ci, EstimationConfig, EstimationMethod};
//! use ci_core::{MetricParams, Result};
//!
//! fn hit_rate(y_true: &[f64], y_pred: &[f64], _params: &MetricParams) -> Result<f64> {
//!     let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
//!     Ok(hits as f64 / y_true.len() as f64)
//! }
//!
//! let y_true = [0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0];
//! let y_pred = [0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];
//! let config = EstimationConfig::new()
//!     .with_method(EstimationMethod::BootstrapPercentile)
//!     .with_resamples(500)
//!     .with_seed(42);
//!
//! let result = estimate_metric_ci(&hit_rate, &y_true, &y_pred, &MetricParams::new(), &config).unwrap();
//! let (point, (lower, upper)) = result.as_tuple();
//! assert_eq!(point, 0.75);
//! assert!(lower <= point && point <= upper);
//! ```

use crate::bootstrap::Bootstrap;
use crate::bootstrap_methods::{
    BCaBootstrap, BasicBootstrap, BootstrapMethod, NormalBootstrap, PercentileBootstrap,
};
use crate::jackknife::jackknife_values;
use crate::{CiWarning, ConfidenceLevel, EstimationConfig, EstimationMethod, MetricEstimate};
use ci_core::{Error, ExecutionEngine, Metric, MetricParams, PairedSample, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// Random source for a configuration: seeded when a seed is set, from entropy otherwise
pub fn config_rng(config: &EstimationConfig) -> ChaCha8Rng {
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!(seed, "bootstrap random source");
    ChaCha8Rng::seed_from_u64(seed)
}

/// Metric value on the full sample; an undefined value is an error here
pub(crate) fn full_sample_estimate<M: Metric + ?Sized>(
    sample: &PairedSample<'_>,
    metric: &M,
    params: &MetricParams,
) -> Result<f64> {
    let value = sample.evaluate(metric, params)?;
    if !value.is_finite() {
        return Err(Error::DegenerateInput(format!(
            "{} is undefined on the full sample (got {value})",
            metric.name()
        )));
    }
    Ok(value)
}

/// Point estimate and confidence interval for any scalar metric
///
/// Defaults to the BCa bootstrap. DeLong applies only to ROC AUC and the
/// binomial methods need success/trial counts, so both are rejected here.
/// `NormalApprox` uses the standard deviation of the bootstrap
/// distribution.
///
/// # Errors
/// - `Error::InputShape` for empty or mismatched inputs
/// - `Error::UnsupportedMethod` for DeLong or binomial methods
/// - `Error::InvalidParameter` for a bad confidence level or zero resamples
/// - `Error::DegenerateInput` if the metric is undefined on the full sample
/// - `Error::InsufficientValidResamples` if every resample was undefined
pub fn estimate_metric_ci<M: Metric + ?Sized>(
    metric: &M,
    y_true: &[f64],
    y_pred: &[f64],
    params: &MetricParams,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    let sample = PairedSample::new(y_true, y_pred)?;
    estimate_sample_ci(&sample, metric, params, config)
}

/// [`estimate_metric_ci`] over a (possibly weighted) paired sample
pub fn estimate_sample_ci<M: Metric + ?Sized>(
    sample: &PairedSample<'_>,
    metric: &M,
    params: &MetricParams,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    estimate_sample_ci_with_rng(sample, metric, params, config, &mut config_rng(config))
}

/// [`estimate_sample_ci`] drawing iteration seeds from `rng` instead of `config.seed`
#[instrument(skip_all, fields(n = sample.len(), metric = metric.name(), method = ?config.method))]
pub fn estimate_sample_ci_with_rng<M, R>(
    sample: &PairedSample<'_>,
    metric: &M,
    params: &MetricParams,
    config: &EstimationConfig,
    rng: &mut R,
) -> Result<MetricEstimate>
where
    M: Metric + ?Sized,
    R: Rng + ?Sized,
{
    let level = config.validate()?;
    let method = config.method_or(EstimationMethod::BootstrapBca);

    match method {
        EstimationMethod::Delong => Err(Error::UnsupportedMethod(format!(
            "delong applies only to ROC AUC, not {}",
            metric.name()
        ))),
        m if m.is_binomial() => Err(Error::UnsupportedMethod(format!(
            "{m} needs a count-based proportion, not an arbitrary metric"
        ))),
        _ => {
            #[cfg(feature = "parallel")]
            if config.parallel {
                return bootstrap_with_engine(
                    ci_core::parallel(), sample, metric, params, method, level, config.n_resamples, rng,
                );
            }
            #[cfg(not(feature = "parallel"))]
            if config.parallel {
                debug!("parallel resampling requested without the parallel feature");
            }
            bootstrap_with_engine(
                ci_core::sequential(), sample, metric, params, method, level, config.n_resamples, rng,
            )
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn bootstrap_with_engine<E, M, R>(
    engine: E,
    sample: &PairedSample<'_>,
    metric: &M,
    params: &MetricParams,
    method: EstimationMethod,
    level: ConfidenceLevel,
    n_resamples: usize,
    rng: &mut R,
) -> Result<MetricEstimate>
where
    E: ExecutionEngine,
    M: Metric + ?Sized,
    R: Rng + ?Sized,
{
    let estimate = full_sample_estimate(sample, metric, params)?;
    let distribution = Bootstrap::new(engine.clone())
        .with_resamples(n_resamples)
        .distribution(sample, metric, params, rng)?;

    let mut warnings = Vec::new();
    let interval = match method {
        EstimationMethod::BootstrapPercentile => {
            PercentileBootstrap.calculate_interval(&distribution.values, estimate, level)?
        }
        EstimationMethod::BootstrapBasic => {
            BasicBootstrap.calculate_interval(&distribution.values, estimate, level)?
        }
        EstimationMethod::NormalApprox => {
            NormalBootstrap.calculate_interval(&distribution.values, estimate, level)?
        }
        EstimationMethod::BootstrapBca => {
            let jackknife = jackknife_values(&engine, sample, metric, params)?;
            let outcome = BCaBootstrap::new(jackknife).calculate_with_diagnostics(
                &distribution.values,
                estimate,
                level,
            )?;
            if let Some(reason) = outcome.fallback_reason {
                warnings.push(CiWarning::BcaFallback { reason });
            }
            outcome.interval
        }
        other => {
            return Err(Error::UnsupportedMethod(format!(
                "{other} is not a resampling method"
            )))
        }
    };

    let interval = match metric.value_range() {
        Some(range) => interval.clipped(range),
        None => interval,
    };

    Ok(MetricEstimate {
        estimate,
        interval,
        method,
        warnings,
        n_valid_resamples: Some(distribution.n_valid()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean_pred(_t: &[f64], p: &[f64], _k: &MetricParams) -> Result<f64> {
        Ok(p.iter().sum::<f64>() / p.len() as f64)
    }

    fn sample_data() -> (Vec<f64>, Vec<f64>) {
        let y_true: Vec<f64> = (0..60).map(|i| (i % 2) as f64).collect();
        let y_pred: Vec<f64> = (0..60).map(|i| ((i * 7919) % 97) as f64 / 97.0).collect();
        (y_true, y_pred)
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let (y_true, y_pred) = sample_data();
        let config = EstimationConfig::new().with_resamples(300).with_seed(123);
        for method in [
            EstimationMethod::BootstrapPercentile,
            EstimationMethod::BootstrapBasic,
            EstimationMethod::BootstrapBca,
            EstimationMethod::NormalApprox,
        ] {
            let config = config.clone().with_method(method);
            let a = estimate_metric_ci(&mean_pred, &y_true, &y_pred, &MetricParams::new(), &config).unwrap();
            let b = estimate_metric_ci(&mean_pred, &y_true, &y_pred, &MetricParams::new(), &config).unwrap();
            assert_eq!(a, b, "{method}");
            assert_eq!(a.method, method);
            assert!(a.interval.contains(a.estimate), "{method}: {}", a.interval);
        }
    }

    #[test]
    fn test_default_method_is_bca() {
        let (y_true, y_pred) = sample_data();
        let config = EstimationConfig::new().with_resamples(200).with_seed(1);
        let result = estimate_metric_ci(&mean_pred, &y_true, &y_pred, &MetricParams::new(), &config).unwrap();
        assert_eq!(result.method, EstimationMethod::BootstrapBca);
        assert_eq!(result.n_valid_resamples, Some(200));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_higher_level_is_wider() {
        let (y_true, y_pred) = sample_data();
        let base = EstimationConfig::new()
            .with_method(EstimationMethod::BootstrapPercentile)
            .with_resamples(1000)
            .with_seed(77);
        let narrow = estimate_metric_ci(
            &mean_pred, &y_true, &y_pred, &MetricParams::new(), &base.clone().with_confidence_level(0.8),
        )
        .unwrap();
        let wide = estimate_metric_ci(
            &mean_pred, &y_true, &y_pred, &MetricParams::new(), &base.with_confidence_level(0.99),
        )
        .unwrap();
        assert!(wide.interval.lower <= narrow.interval.lower);
        assert!(wide.interval.upper >= narrow.interval.upper);
        assert!(wide.interval.width() > narrow.interval.width());
    }

    #[test]
    fn test_constant_metric_bca_falls_back() {
        let constant = |_t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> { Ok(0.5) };
        let config = EstimationConfig::new().with_resamples(50).with_seed(2);
        let result = estimate_metric_ci(&constant, &[0.0, 1.0, 0.0], &[1.0, 1.0, 0.0], &MetricParams::new(), &config)
            .unwrap();
        assert_eq!(result.as_tuple(), (0.5, (0.5, 0.5)));
        assert!(matches!(result.warnings.as_slice(), [CiWarning::BcaFallback { .. }]));
    }

    #[test]
    fn test_unsupported_methods() {
        let (y_true, y_pred) = sample_data();
        for method in [EstimationMethod::Delong, EstimationMethod::Wilson, EstimationMethod::Jeffreys] {
            let config = EstimationConfig::new().with_method(method).with_resamples(10);
            assert!(matches!(
                estimate_metric_ci(&mean_pred, &y_true, &y_pred, &MetricParams::new(), &config),
                Err(Error::UnsupportedMethod(_))
            ));
        }
    }

    #[test]
    fn test_shape_errors() {
        let config = EstimationConfig::new().with_resamples(10);
        assert!(matches!(
            estimate_metric_ci(&mean_pred, &[0.0, 1.0], &[0.0], &MetricParams::new(), &config),
            Err(Error::InputShape(_))
        ));
        assert!(matches!(
            estimate_metric_ci(&mean_pred, &[], &[], &MetricParams::new(), &config),
            Err(Error::InputShape(_))
        ));
    }

    #[test]
    fn test_undefined_full_sample_is_degenerate() {
        let undefined = |_t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> { Ok(f64::NAN) };
        let config = EstimationConfig::new().with_resamples(10).with_seed(0);
        assert!(matches!(
            estimate_metric_ci(&undefined, &[0.0, 1.0], &[0.0, 1.0], &MetricParams::new(), &config),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_all_resamples_degenerate() {
        // Only defined on strictly increasing labels, which a resample of
        // 20 distinct rows almost never reproduces
        let increasing = |t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> {
            if t.windows(2).all(|w| w[0] < w[1]) {
                Ok(1.0)
            } else {
                Err(Error::DegenerateInput("repeated rows".into()))
            }
        };
        let y_true: Vec<f64> = (0..20).map(f64::from).collect();
        let config = EstimationConfig::new()
            .with_method(EstimationMethod::BootstrapPercentile)
            .with_resamples(20)
            .with_seed(4);
        let err = estimate_metric_ci(&increasing, &y_true, &y_true, &MetricParams::new(), &config).unwrap_err();
        assert!(matches!(err, Error::InsufficientValidResamples { valid: 0, requested: 20 }));
    }

    #[test]
    fn test_value_range_clips_interval() {
        struct Bounded;
        impl Metric for Bounded {
            fn evaluate(&self, _t: &[f64], p: &[f64], _k: &MetricParams) -> Result<f64> {
                Ok(p.iter().sum::<f64>() / p.len() as f64)
            }
            fn value_range(&self) -> Option<(f64, f64)> {
                Some((0.0, 1.0))
            }
        }
        let y_pred = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0];
        let config = EstimationConfig::new()
            .with_method(EstimationMethod::NormalApprox)
            .with_resamples(500)
            .with_seed(8);
        let result = estimate_metric_ci(&Bounded, &[0.0; 8], &y_pred, &MetricParams::new(), &config).unwrap();
        assert!(result.interval.upper <= 1.0);
        assert!(result.interval.lower >= 0.0);
    }
}
