//! Count-based classification metrics
//!
//! Every metric here is a function of one-vs-rest confusion counts.
//! Accuracy ignores averaging. The others read the `average` parameter:
//! binary uses class 1 as positive, micro pools counts over all classes,
//! macro averages per-class values. A zero denominator yields 0.

use crate::average::Average;
use crate::confusion::{check_binary, classes, safe_div, ConfusionCounts, Ratio};
use ci_core::{Metric, MetricParams, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A classification metric computed from confusion counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMetric {
    /// Fraction of predictions equal to the label
    Accuracy,
    /// Positive predictive value (precision): `tp / (tp + fp)`
    Ppv,
    /// Negative predictive value: `tn / (tn + fn)`
    Npv,
    /// True positive rate (recall, sensitivity): `tp / (tp + fn)`
    Tpr,
    /// False positive rate: `fp / (fp + tn)`
    Fpr,
    /// True negative rate (specificity): `tn / (tn + fp)`
    Tnr,
    /// Harmonic mean of precision and recall: `2tp / (2tp + fp + fn)`
    F1,
}

impl ClassificationMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Ppv => "ppv",
            Self::Npv => "npv",
            Self::Tpr => "tpr",
            Self::Fpr => "fpr",
            Self::Tnr => "tnr",
            Self::F1 => "f1",
        }
    }

    /// The proportion for one set of counts; `None` for F1
    fn proportion(self, c: &ConfusionCounts) -> Option<Ratio> {
        match self {
            Self::Accuracy => Some(Ratio::new(c.tp + c.tn, c.total())),
            Self::Ppv => Some(Ratio::new(c.tp, c.tp + c.fp)),
            Self::Npv => Some(Ratio::new(c.tn, c.tn + c.fn_)),
            Self::Tpr => Some(Ratio::new(c.tp, c.tp + c.fn_)),
            Self::Fpr => Some(Ratio::new(c.fp, c.fp + c.tn)),
            Self::Tnr => Some(Ratio::new(c.tn, c.tn + c.fp)),
            Self::F1 => None,
        }
    }

    fn value_from_counts(self, c: &ConfusionCounts) -> f64 {
        match self.proportion(c) {
            Some(ratio) => ratio.value(),
            None => safe_div(2.0 * c.tp as f64, (2 * c.tp + c.fp + c.fn_) as f64),
        }
    }

    /// The binomial proportion behind this metric, when there is one
    ///
    /// Accuracy is always `correct / total`. Other metrics are proportions
    /// under binary or micro averaging; macro averages and F1 are not.
    pub fn ratio(self, y_true: &[f64], y_pred: &[f64], average: Average) -> Result<Option<Ratio>> {
        if self == Self::Accuracy {
            ci_core::check_paired_lengths(y_true.len(), y_pred.len(), None)?;
            let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
            return Ok(Some(Ratio::new(correct, y_true.len())));
        }
        Ok(match average {
            Average::Binary => {
                check_binary(y_true, y_pred)?;
                self.proportion(&ConfusionCounts::for_class(y_true, y_pred, 1.0))
            }
            Average::Micro => self.proportion(&pooled_counts(y_true, y_pred)?),
            Average::Macro => None,
        })
    }

    /// Metric value under the given averaging
    pub fn compute(self, y_true: &[f64], y_pred: &[f64], average: Average) -> Result<f64> {
        if let Some(ratio) = self.ratio(y_true, y_pred, average)? {
            return Ok(ratio.value());
        }
        match average {
            Average::Binary => {
                check_binary(y_true, y_pred)?;
                Ok(self.value_from_counts(&ConfusionCounts::for_class(y_true, y_pred, 1.0)))
            }
            Average::Micro => Ok(self.value_from_counts(&pooled_counts(y_true, y_pred)?)),
            Average::Macro => {
                let labels = classes(y_true, y_pred)?;
                let total: f64 = labels
                    .iter()
                    .map(|&class| self.value_from_counts(&ConfusionCounts::for_class(y_true, y_pred, class)))
                    .sum();
                Ok(total / labels.len() as f64)
            }
        }
    }
}

fn pooled_counts(y_true: &[f64], y_pred: &[f64]) -> Result<ConfusionCounts> {
    Ok(classes(y_true, y_pred)?
        .into_iter()
        .map(|class| ConfusionCounts::for_class(y_true, y_pred, class))
        .fold(ConfusionCounts::default(), |acc, c| acc + c))
}

impl Metric for ClassificationMetric {
    fn evaluate(&self, y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
        self.compute(y_true, y_pred, Average::from_params(params)?)
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        Some((0.0, 1.0))
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ClassificationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraction of correct predictions
pub fn accuracy(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Accuracy.evaluate(y_true, y_pred, params)
}

/// Positive predictive value
pub fn ppv(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Ppv.evaluate(y_true, y_pred, params)
}

/// Negative predictive value
pub fn npv(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Npv.evaluate(y_true, y_pred, params)
}

/// True positive rate
pub fn tpr(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Tpr.evaluate(y_true, y_pred, params)
}

/// False positive rate
pub fn fpr(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Fpr.evaluate(y_true, y_pred, params)
}

/// True negative rate
pub fn tnr(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::Tnr.evaluate(y_true, y_pred, params)
}

pub fn precision(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ppv(y_true, y_pred, params)
}

pub fn recall(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    tpr(y_true, y_pred, params)
}

pub fn f1(y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
    ClassificationMetric::F1.evaluate(y_true, y_pred, params)
}
