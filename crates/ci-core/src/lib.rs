//! Core traits and types for classification-metric confidence intervals
//!
//! This crate provides the pieces shared by the rank statistics, the
//! interval builders and the metric wrappers:
//!
//! - **Errors**: one [`Error`] enum covering shape, degeneracy and
//!   configuration failures
//! - **Metric contract**: the [`Metric`] trait, satisfied by any
//!   `Fn(&[f64], &[f64], &MetricParams) -> Result<f64>`
//! - **Execution engines**: sequential or Rayon-parallel batch execution
//! - **Workspaces**: per-thread buffers for paired resampling
//! - **Math**: standard-normal and Beta quantiles
//!
//! # Example
//!
//! ```rust
//! use ci_core::{Metric, MetricParams, PairedSample, Result};
//!
//! fn hit_rate(y_true: &[f64], y_pred: &[f64], _params: &MetricParams) -> Result<f64> {
//!     let hits = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
//!     Ok(hits as f64 / y_true.len() as f64)
//! }
//!
//! let sample = PairedSample::new(&[0.0, 1.0, 1.0, 0.0], &[0.0, 1.0, 0.0, 0.0]).unwrap();
//! let value = sample.evaluate(&hit_rate, &MetricParams::new()).unwrap();
//! assert_eq!(value, 0.75);
//! ```

pub mod error;
pub mod execution;
pub mod math;
pub mod numeric;
pub mod traits;
pub mod workspace;

// Re-export core types
pub use error::{check_paired_lengths, Error, Result};

pub use execution::{sequential, ExecutionEngine, ExecutionStrategy, SequentialEngine};
#[cfg(feature = "parallel")]
pub use execution::{parallel, ParallelEngine};

pub use numeric::{to_f64_vec, Numeric};
pub use traits::{Metric, MetricParams, PairedSample, ParamValue};
pub use workspace::{with_resample_workspace, ResampleWorkspace};
