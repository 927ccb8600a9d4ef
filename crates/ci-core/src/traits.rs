//! The metric capability contract
//!
//! Interval construction treats the metric as a black box: any value that
//! can turn a pair of equal-length label/prediction sequences plus a map of
//! keyword parameters into a single real number. Plain functions and closures
//! with the signature `Fn(&[f64], &[f64], &MetricParams) -> Result<f64>`
//! satisfy the contract through a blanket implementation.

use crate::{error::check_paired_lengths, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single metric keyword parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// String-keyed metric keyword parameters (e.g. `average = "macro"`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricParams(BTreeMap<String, ParamValue>);

impl MetricParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Text parameter; a non-text value under `key` is an error
    pub fn get_text(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ParamValue::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(Error::InvalidParameter(format!(
                "Parameter '{key}' must be text, got {other}"
            ))),
        }
    }

    /// Numeric parameter; a non-numeric value under `key` is an error
    pub fn get_number(&self, key: &str) -> Result<Option<f64>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ParamValue::Number(v)) => Ok(Some(*v)),
            Some(other) => Err(Error::InvalidParameter(format!(
                "Parameter '{key}' must be a number, got {other}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

/// A scalar performance metric over paired labels and predictions
pub trait Metric: Send + Sync {
    /// Evaluate on equal-length label and prediction sequences
    ///
    /// Returns `Error::DegenerateInput` (or a non-finite value) when the
    /// metric is undefined for this particular input, e.g. a resample
    /// containing a single class.
    fn evaluate(&self, y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64>;

    /// Evaluate with per-element sample weights
    fn evaluate_weighted(
        &self,
        _y_true: &[f64],
        _y_pred: &[f64],
        _sample_weight: &[f64],
        _params: &MetricParams,
    ) -> Result<f64> {
        Err(Error::InvalidParameter(format!(
            "{} does not accept sample weights",
            self.name()
        )))
    }

    /// Closed range of attainable values, used to clip analytic intervals
    fn value_range(&self) -> Option<(f64, f64)> {
        None
    }

    fn name(&self) -> &str {
        "metric"
    }
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64], &MetricParams) -> Result<f64> + Send + Sync,
{
    fn evaluate(&self, y_true: &[f64], y_pred: &[f64], params: &MetricParams) -> Result<f64> {
        self(y_true, y_pred, params)
    }
}

/// Borrowed view over positionally paired labels, predictions and optional weights
#[derive(Debug, Clone, Copy)]
pub struct PairedSample<'a> {
    pub y_true: &'a [f64],
    pub y_pred: &'a [f64],
    pub sample_weight: Option<&'a [f64]>,
}

impl<'a> PairedSample<'a> {
    /// Pair labels with predictions, checking shapes
    pub fn new(y_true: &'a [f64], y_pred: &'a [f64]) -> Result<Self> {
        check_paired_lengths(y_true.len(), y_pred.len(), None)?;
        Ok(Self {
            y_true,
            y_pred,
            sample_weight: None,
        })
    }

    /// Attach sample weights; they must be finite and non-negative
    pub fn with_weights(mut self, sample_weight: Option<&'a [f64]>) -> Result<Self> {
        if let Some(w) = sample_weight {
            check_paired_lengths(self.y_true.len(), self.y_pred.len(), Some(w.len()))?;
            if let Some(bad) = w.iter().find(|&&x| !x.is_finite() || x < 0.0) {
                return Err(Error::InvalidInput(format!(
                    "Sample weights must be finite and non-negative, got {bad}"
                )));
            }
        }
        self.sample_weight = sample_weight;
        Ok(self)
    }

    /// Build a view without re-validating; callers guarantee equal lengths
    pub(crate) fn from_parts(
        y_true: &'a [f64],
        y_pred: &'a [f64],
        sample_weight: Option<&'a [f64]>,
    ) -> Self {
        Self {
            y_true,
            y_pred,
            sample_weight,
        }
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }

    /// Evaluate a metric on this sample, routing weights when present
    pub fn evaluate<M: Metric + ?Sized>(&self, metric: &M, params: &MetricParams) -> Result<f64> {
        match self.sample_weight {
            Some(w) => metric.evaluate_weighted(self.y_true, self.y_pred, w, params),
            None => metric.evaluate(self.y_true, self.y_pred, params),
        }
    }
}
