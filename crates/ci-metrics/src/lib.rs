//! Classification metrics with confidence intervals
//!
//! Each score function returns a [`MetricEstimate`] carrying the point
//! estimate, the interval and the method that produced it.
//!
//! ```rust
//! use ci_metrics::{f1_score, precision_score, Average};
//! use ci_confidence::EstimationConfig;
//!
//! let y_true = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
//! let y_pred = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
//!
//! let config = EstimationConfig::new().with_resamples(500).with_seed(1);
//! let (precision, (lo, hi)) = precision_score(&y_true, &y_pred, Average::Micro, &config)
//!     .unwrap()
//!     .as_tuple();
//! assert!((precision - 7.0 / 9.0).abs() < 1e-12);
//! assert!(lo < precision && precision < hi);
//!
//! let f1 = f1_score(&y_true, &y_pred, Average::Macro, &config).unwrap();
//! assert!((f1.estimate - 0.775).abs() < 1e-12);
//! ```

pub mod average;
pub mod classification;
pub mod confusion;
mod scores;

pub use average::{Average, AVERAGE_PARAM};
pub use ci_confidence::MetricEstimate;
pub use classification::{
    accuracy, f1, fpr, npv, ppv, precision, recall, tnr, tpr, ClassificationMetric,
};
pub use confusion::{ConfusionCounts, Ratio};
pub use scores::{
    accuracy_score, classification_score, f1_score, fpr_score, npv_score, ppv_score,
    precision_score, recall_score, roc_auc_score, tnr_score, tpr_score,
};
