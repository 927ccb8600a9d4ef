//! Error types for confidence interval estimation
//!
//! Provides a unified error type for all ci-* crates.

use thiserror::Error;

/// Core error type for interval estimation
#[derive(Error, Debug)]
pub enum Error {
    /// Arrays of mismatched length, or empty input
    #[error("Input shape error: {0}")]
    InputShape(String),

    /// Input values outside their admissible domain
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The statistic is undefined for this input (e.g. a single class present)
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Estimation method not recognized, or not applicable to the metric
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Every bootstrap resample was degenerate
    #[error("Insufficient valid resamples: {valid} of {requested} resamples produced a finite statistic")]
    InsufficientValidResamples { valid: usize, requested: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for empty input
    pub fn empty_input(context: &str) -> Self {
        Self::InputShape(format!("{context} requires at least one element"))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::InputShape(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Whether this error is recoverable inside a resampling loop
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateInput(_))
    }
}

/// Check that paired arrays share a non-zero length
pub fn check_paired_lengths(y_true: usize, y_pred: usize, weights: Option<usize>) -> Result<()> {
    if y_true == 0 {
        return Err(Error::empty_input("label array"));
    }
    if y_pred != y_true {
        return Err(Error::size_mismatch(y_true, y_pred, "prediction array"));
    }
    if let Some(w) = weights {
        if w != y_true {
            return Err(Error::size_mismatch(y_true, w, "sample weights"));
        }
    }
    Ok(())
}
