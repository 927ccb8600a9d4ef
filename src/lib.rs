//! Confidence intervals for classification metrics
//!
//! Facade over the workspace crates:
//!
//! - [`ci_core`]: errors, the metric contract, execution engines
//! - [`ci_rank`]: midranks and the DeLong AUC variance
//! - [`ci_confidence`]: bootstrap, DeLong and binomial interval builders
//! - [`ci_metrics`]: accuracy, PPV/NPV, TPR/FPR/TNR, F1 and ROC AUC scores
//!
//! The most used items are re-exported at the root.
//!
//! ```rust
//! use confidence_interval::{roc_auc_score, EstimationConfig};
//!
//! let y_true = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
//! let y_score = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
//!
//! let config = EstimationConfig::new().with_method_str("delong").unwrap();
//! let (auc, (lower, upper)) = roc_auc_score(&y_true, &y_score, None, &config)
//!     .unwrap()
//!     .as_tuple();
//! assert!((auc - 0.775).abs() < 1e-12);
//! assert!(lower < auc && upper == 1.0);
//! ```

pub use ci_confidence;
pub use ci_core;
pub use ci_metrics;
pub use ci_rank;

pub use ci_core::{Error, Metric, MetricParams, PairedSample, Result};

pub use ci_rank::{compute_midrank, compute_midrank_weight, delong_roc_variance, DeLongEstimate};

pub use ci_confidence::{
    estimate_auc_ci, estimate_metric_ci, proportion_confint, CiWarning, ConfidenceInterval,
    ConfidenceLevel, EstimationConfig, EstimationMethod, MetricEstimate,
};

pub use ci_metrics::{
    accuracy_score, f1_score, fpr_score, npv_score, ppv_score, precision_score, recall_score,
    roc_auc_score, tnr_score, tpr_score, Average, ClassificationMetric,
};
