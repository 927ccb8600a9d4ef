//! One-vs-rest confusion counts

use ci_core::{check_paired_lengths, Error, Result};
use std::ops::Add;

/// A count-based proportion `successes / trials`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    pub successes: usize,
    pub trials: usize,
}

impl Ratio {
    pub fn new(successes: usize, trials: usize) -> Self {
        Self { successes, trials }
    }

    /// The proportion, zero when there are no trials
    pub fn value(&self) -> f64 {
        safe_div(self.successes as f64, self.trials as f64)
    }
}

pub(crate) fn safe_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// True/false positive/negative counts for one class against the rest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionCounts {
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

impl ConfusionCounts {
    /// Counts treating `class` as positive
    pub fn for_class(y_true: &[f64], y_pred: &[f64], class: f64) -> Self {
        y_true
            .iter()
            .zip(y_pred)
            .fold(Self::default(), |mut c, (&t, &p)| {
                match (t == class, p == class) {
                    (true, true) => c.tp += 1,
                    (false, true) => c.fp += 1,
                    (false, false) => c.tn += 1,
                    (true, false) => c.fn_ += 1,
                }
                c
            })
    }

    pub fn total(&self) -> usize {
        self.tp + self.fp + self.tn + self.fn_
    }
}

impl Add for ConfusionCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            tp: self.tp + other.tp,
            fp: self.fp + other.fp,
            tn: self.tn + other.tn,
            fn_: self.fn_ + other.fn_,
        }
    }
}

/// Sorted distinct labels appearing in either sequence
///
/// # Errors
/// `Error::InputShape` on empty or mismatched input, `Error::InvalidInput`
/// for NaN labels.
pub fn classes(y_true: &[f64], y_pred: &[f64]) -> Result<Vec<f64>> {
    check_paired_lengths(y_true.len(), y_pred.len(), None)?;
    if y_true.iter().chain(y_pred).any(|v| v.is_nan()) {
        return Err(Error::InvalidInput("Labels must not be NaN".to_string()));
    }
    let mut labels: Vec<f64> = y_true.iter().chain(y_pred).copied().collect();
    labels.sort_by(f64::total_cmp);
    labels.dedup();
    Ok(labels)
}

/// Reject labels outside {0, 1} for binary averaging
pub fn check_binary(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    check_paired_lengths(y_true.len(), y_pred.len(), None)?;
    match y_true.iter().chain(y_pred).find(|&&v| v != 0.0 && v != 1.0) {
        Some(v) => Err(Error::InvalidInput(format!(
            "Binary averaging needs labels in {{0, 1}}, got {v}; use micro or macro averaging"
        ))),
        None => Ok(()),
    }
}
