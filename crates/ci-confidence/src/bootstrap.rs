//! Paired bootstrap resampling engine
//!
//! Each iteration draws `n` indices uniformly with replacement and gathers
//! labels, predictions and weights at those same indices, so rows are never
//! split apart. Iterations are independent: the caller's random source only
//! supplies one seed per iteration, and every iteration runs its own ChaCha
//! stream. The distribution is therefore identical whether the batch runs
//! sequentially or on the Rayon pool.
//!
//! Resamples on which the metric is undefined (a `DegenerateInput` error or
//! a non-finite value) are excluded from the distribution and counted.

use crate::config::DEFAULT_RESAMPLES;
use ci_core::{
    with_resample_workspace, Error, ExecutionEngine, Metric, MetricParams, PairedSample, Result,
};
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument, warn};

/// Sort key treating incomparable values as equal
pub(crate) fn sort_f64(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
}

/// Decide whether a metric outcome enters a distribution
///
/// `Ok(None)` marks an excluded value; any error other than
/// `DegenerateInput` aborts the whole computation.
pub(crate) fn admit(outcome: Result<f64>) -> Result<Option<f64>> {
    match outcome {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(e) if e.is_degenerate() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Metric values over the surviving bootstrap resamples
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDistribution {
    /// Finite metric values in iteration order
    pub values: Vec<f64>,
    /// Resamples drawn
    pub n_requested: usize,
    /// Resamples excluded as degenerate
    pub n_discarded: usize,
}

impl BootstrapDistribution {
    pub fn n_valid(&self) -> usize {
        self.values.len()
    }

    /// Values in ascending order
    pub fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.values.clone();
        sort_f64(&mut sorted);
        sorted
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Unbiased standard deviation; zero for fewer than two values
    pub fn std_dev(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    }
}

/// Bootstrap resampling engine
#[derive(Debug, Clone)]
pub struct Bootstrap<E> {
    engine: E,
    n_resamples: usize,
}

impl<E: ExecutionEngine> Bootstrap<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            n_resamples: DEFAULT_RESAMPLES,
        }
    }

    /// Set the number of bootstrap resamples
    pub fn with_resamples(mut self, n_resamples: usize) -> Self {
        self.n_resamples = n_resamples;
        self
    }

    pub fn n_resamples(&self) -> usize {
        self.n_resamples
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Draw the bootstrap distribution of `metric` over `sample`
    ///
    /// # Errors
    /// - `Error::InvalidParameter` if the resample count is zero
    /// - `Error::InputShape` for an empty sample
    /// - `Error::InsufficientValidResamples` if every resample was excluded
    /// - any non-degenerate error raised by the metric
    #[instrument(skip_all, fields(n = sample.len(), n_resamples = self.n_resamples, metric = metric.name()))]
    pub fn distribution<M, R>(
        &self,
        sample: &PairedSample<'_>,
        metric: &M,
        params: &MetricParams,
        rng: &mut R,
    ) -> Result<BootstrapDistribution>
    where
        M: Metric + ?Sized,
        R: Rng + ?Sized,
    {
        if self.n_resamples == 0 {
            return Err(Error::InvalidParameter(
                "Number of resamples must be positive".to_string(),
            ));
        }
        if sample.is_empty() {
            return Err(Error::empty_input("bootstrap sample"));
        }

        let n = sample.len();
        let seeds: Vec<u64> = (0..self.n_resamples).map(|_| rng.gen()).collect();
        let index_dist = Uniform::new(0, n);

        let outcomes = self.engine.execute_batch(self.n_resamples, |i| {
            let mut iter_rng = ChaCha8Rng::seed_from_u64(seeds[i]);
            let indices: Vec<usize> = (0..n).map(|_| index_dist.sample(&mut iter_rng)).collect();
            let outcome = with_resample_workspace(|ws| {
                ws.gather(sample, &indices);
                ws.view().evaluate(metric, params)
            });
            admit(outcome)
        });

        let mut values = Vec::with_capacity(self.n_resamples);
        for outcome in outcomes {
            if let Some(v) = outcome? {
                values.push(v);
            }
        }

        let n_discarded = self.n_resamples - values.len();
        if values.is_empty() {
            return Err(Error::InsufficientValidResamples {
                valid: 0,
                requested: self.n_resamples,
            });
        }
        if n_discarded > 0 {
            warn!(n_discarded, n_resamples = self.n_resamples, "excluded degenerate resamples");
        }
        debug!(n_valid = values.len(), "bootstrap distribution ready");

        Ok(BootstrapDistribution {
            values,
            n_requested: self.n_resamples,
            n_discarded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ci_core::sequential;

    fn mean_pred(_t: &[f64], p: &[f64], _k: &MetricParams) -> Result<f64> {
        Ok(p.iter().sum::<f64>() / p.len() as f64)
    }

    #[test]
    fn test_seeded_distribution_is_reproducible() {
        let y_true = [0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
        let y_pred = [0.1, 0.9, 0.3, 0.7, 0.8, 0.2];
        let sample = PairedSample::new(&y_true, &y_pred).unwrap();
        let boot = Bootstrap::new(sequential()).with_resamples(200);

        let a = boot
            .distribution(&sample, &mean_pred, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        let b = boot
            .distribution(&sample, &mean_pred, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(9))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.n_valid(), 200);
        assert_eq!(a.n_discarded, 0);
    }

    #[test]
    fn test_resampling_keeps_rows_paired() {
        let y_true: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y_pred: Vec<f64> = y_true.iter().map(|v| v * 10.0 + 1.0).collect();
        let sample = PairedSample::new(&y_true, &y_pred).unwrap();

        let paired_check = |t: &[f64], p: &[f64], _k: &MetricParams| -> Result<f64> {
            if t.iter().zip(p).any(|(a, b)| *b != a * 10.0 + 1.0) {
                return Err(Error::Computation("rows were split".into()));
            }
            Ok(t.iter().sum())
        };

        let dist = Bootstrap::new(sequential())
            .with_resamples(100)
            .distribution(&sample, &paired_check, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert_eq!(dist.n_valid(), 100);
    }

    #[test]
    fn test_metric_may_resample_internally() {
        let y_true: Vec<f64> = (0..12).map(|i| (i % 2) as f64).collect();
        let y_pred: Vec<f64> = (0..12).map(|i| i as f64 / 12.0).collect();
        let sample = PairedSample::new(&y_true, &y_pred).unwrap();

        // Inner bootstrap mean of the predictions
        let nested = |t: &[f64], p: &[f64], k: &MetricParams| -> Result<f64> {
            let inner = PairedSample::new(t, p)?;
            let dist = Bootstrap::new(sequential()).with_resamples(5).distribution(
                &inner,
                &mean_pred,
                k,
                &mut ChaCha8Rng::seed_from_u64(0),
            )?;
            Ok(dist.mean())
        };

        let dist = Bootstrap::new(sequential())
            .with_resamples(20)
            .distribution(&sample, &nested, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(4))
            .unwrap();
        assert_eq!(dist.n_valid(), 20);
        assert!(dist.values.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_degenerate_resamples_are_excluded() {
        // Undefined whenever the resample misses the single positive row
        let y_true = [1.0, 0.0, 0.0, 0.0, 0.0];
        let y_pred = [1.0, 0.0, 1.0, 0.0, 0.0];
        let sample = PairedSample::new(&y_true, &y_pred).unwrap();
        let needs_positive = |t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> {
            if t.iter().all(|v| *v == 0.0) {
                Err(Error::DegenerateInput("no positives".into()))
            } else {
                Ok(1.0)
            }
        };

        let dist = Bootstrap::new(sequential())
            .with_resamples(500)
            .distribution(&sample, &needs_positive, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        assert!(dist.n_discarded > 0);
        assert_eq!(dist.n_valid() + dist.n_discarded, 500);
        assert!(dist.values.iter().all(|v| *v == 1.0));
    }

    #[test]
    fn test_non_finite_values_are_excluded() {
        let sample = PairedSample::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let always_nan = |_t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> { Ok(f64::NAN) };
        let err = Bootstrap::new(sequential())
            .with_resamples(10)
            .distribution(&sample, &always_nan, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientValidResamples { valid: 0, requested: 10 }
        ));
    }

    #[test]
    fn test_other_metric_errors_abort() {
        let sample = PairedSample::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let broken = |_t: &[f64], _p: &[f64], _k: &MetricParams| -> Result<f64> {
            Err(Error::InvalidParameter("bad average".into()))
        };
        let err = Bootstrap::new(sequential())
            .with_resamples(10)
            .distribution(&sample, &broken, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_zero_resamples_rejected() {
        let sample = PairedSample::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let err = Bootstrap::new(sequential())
            .with_resamples(0)
            .distribution(&sample, &mean_pred, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_weights_travel_with_rows() {
        let y_true = [0.0, 1.0, 2.0, 3.0];
        let weights = [0.0, 1.0, 2.0, 3.0];
        let sample = PairedSample::new(&y_true, &y_true)
            .unwrap()
            .with_weights(Some(&weights[..]))
            .unwrap();

        struct WeightEqualsLabel;
        impl Metric for WeightEqualsLabel {
            fn evaluate(&self, _t: &[f64], _p: &[f64], _k: &MetricParams) -> Result<f64> {
                Err(Error::Computation("weights dropped".into()))
            }
            fn evaluate_weighted(&self, t: &[f64], _p: &[f64], w: &[f64], _k: &MetricParams) -> Result<f64> {
                assert_eq!(t, w);
                Ok(w.iter().sum())
            }
        }

        let dist = Bootstrap::new(sequential())
            .with_resamples(50)
            .distribution(&sample, &WeightEqualsLabel, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        assert_eq!(dist.n_valid(), 50);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let y_true: Vec<f64> = (0..50).map(|i| (i % 2) as f64).collect();
        let y_pred: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        let sample = PairedSample::new(&y_true, &y_pred).unwrap();

        let seq = Bootstrap::new(sequential())
            .with_resamples(300)
            .distribution(&sample, &mean_pred, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(11))
            .unwrap();
        let par = Bootstrap::new(ci_core::parallel())
            .with_resamples(300)
            .distribution(&sample, &mean_pred, &MetricParams::new(), &mut ChaCha8Rng::seed_from_u64(11))
            .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_distribution_summary() {
        let dist = BootstrapDistribution {
            values: vec![3.0, 1.0, 2.0],
            n_requested: 3,
            n_discarded: 0,
        };
        assert_eq!(dist.sorted(), vec![1.0, 2.0, 3.0]);
        assert_eq!(dist.mean(), 2.0);
        assert_eq!(dist.std_dev(), 1.0);
    }
}
