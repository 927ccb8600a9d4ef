//! Rank statistics and the DeLong AUC estimator
//!
//! - [`compute_midrank`] / [`compute_midrank_weight`]: tie-aware ranks,
//!   optionally measured in cumulative sample weight
//! - [`delong_roc_variance`]: ROC AUC with its asymptotic (DeLong) variance
//! - [`auc_point_estimate`]: the AUC alone, defined whenever both classes
//!   are present

pub mod delong;
pub mod midrank;

pub use delong::{
    auc_point_estimate, delong_auc_variance, delong_roc_variance, ClassSplit, DeLongEstimate,
};
pub use midrank::{compute_midrank, compute_midrank_weight};
