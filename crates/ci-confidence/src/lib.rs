//! Confidence intervals for classification metrics
//!
//! This crate turns either an analytic variance or a bootstrap
//! distribution into a confidence interval:
//!
//! - **DeLong intervals**: analytic ROC AUC variance with a normal
//!   approximation ([`estimate_auc_ci`])
//! - **Bootstrap intervals**: percentile, basic, normal and BCa intervals
//!   around any metric satisfying [`ci_core::Metric`] ([`estimate_metric_ci`])
//! - **Binomial intervals**: Wald, Wilson, Agresti-Coull, Clopper-Pearson and
//!   Jeffreys intervals for count-based proportions ([`proportion_confint`])
//!
//! # Example
//!
//! ```rust
//! use ci_confidence::{estimate_auc_ci, EstimationConfig};
//!
//! let y_true = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
//! let y_score = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
//!
//! let result = estimate_auc_ci(&y_true, &y_score, None, &EstimationConfig::default()).unwrap();
//! let (auc, (lower, upper)) = result.as_tuple();
//! assert!((auc - 0.775).abs() < 1e-12);
//! assert!(lower < auc && upper <= 1.0);
//! ```

pub mod api;
mod asymptotic;
mod auc;
mod bootstrap;
mod bootstrap_methods;
mod config;
mod jackknife;
mod method;
mod types;

// Re-exports
pub use api::{
    config_rng, estimate_metric_ci, estimate_sample_ci, estimate_sample_ci_with_rng,
};
pub use asymptotic::{normal_approx, proportion_confint};
pub use auc::{estimate_auc_ci, estimate_auc_ci_with_rng, RocAuc};
pub use bootstrap::{Bootstrap, BootstrapDistribution};
pub use bootstrap_methods::{
    quantile_linear_sorted, BCaBootstrap, BasicBootstrap, BcaDiagnostics, BcaOutcome,
    BootstrapMethod, NormalBootstrap, PercentileBootstrap,
};
pub use config::{EstimationConfig, DEFAULT_RESAMPLES, FAST_RESAMPLES, HIGH_PRECISION_RESAMPLES};
pub use jackknife::jackknife_values;
pub use method::EstimationMethod;
pub use types::{CiWarning, ConfidenceInterval, ConfidenceLevel, MetricEstimate};
