//! Score functions returning a point estimate with its confidence interval
//!
//! Metrics that are a proportion of counts (accuracy, and the rates under
//! binary or micro averaging) default to the Wilson score interval. Macro
//! averages and F1 default to the BCa bootstrap. ROC AUC defaults to DeLong.

use crate::average::Average;
use crate::classification::ClassificationMetric;
use ci_confidence::{
    estimate_auc_ci, estimate_metric_ci, proportion_confint, EstimationConfig, EstimationMethod,
    MetricEstimate,
};
use ci_core::{Error, Result};
use tracing::{debug, instrument};

/// Point estimate and interval for a classification metric
///
/// # Errors
/// - `Error::UnsupportedMethod` for DeLong, or for a binomial method on a
///   metric that is not a proportion (F1, macro averages)
/// - `Error::DegenerateInput` for a binomial interval with a zero denominator
/// - anything [`estimate_metric_ci`] returns for bootstrap methods
#[instrument(skip(y_true, y_pred), fields(n = y_true.len()))]
pub fn classification_score(
    metric: ClassificationMetric,
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    let ratio = metric.ratio(y_true, y_pred, average)?;
    let default = if ratio.is_some() {
        EstimationMethod::Wilson
    } else {
        EstimationMethod::BootstrapBca
    };
    let method = config.method_or(default);

    match (method, ratio) {
        (m, Some(ratio)) if m.is_binomial() || m == EstimationMethod::NormalApprox => {
            let level = config.validate()?;
            debug!(successes = ratio.successes, trials = ratio.trials, "binomial interval");
            Ok(MetricEstimate {
                estimate: ratio.value(),
                interval: proportion_confint(ratio.successes, ratio.trials, level, m)?,
                method: m,
                warnings: Vec::new(),
                n_valid_resamples: None,
            })
        }
        (m, None) if m.is_binomial() => Err(Error::UnsupportedMethod(format!(
            "{m} needs a count-based proportion; {metric} with {average} averaging is not one"
        ))),
        (m, _) => estimate_metric_ci(
            &metric,
            y_true,
            y_pred,
            &average.to_params(),
            &config.clone().with_method(m),
        ),
    }
}

/// Accuracy with a confidence interval
pub fn accuracy_score(y_true: &[f64], y_pred: &[f64], config: &EstimationConfig) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Accuracy, y_true, y_pred, Average::Binary, config)
}

/// Positive predictive value with a confidence interval
pub fn ppv_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Ppv, y_true, y_pred, average, config)
}

/// Negative predictive value with a confidence interval
pub fn npv_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Npv, y_true, y_pred, average, config)
}

/// True positive rate with a confidence interval
pub fn tpr_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Tpr, y_true, y_pred, average, config)
}

/// False positive rate with a confidence interval
pub fn fpr_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Fpr, y_true, y_pred, average, config)
}

/// True negative rate with a confidence interval
pub fn tnr_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::Tnr, y_true, y_pred, average, config)
}

pub fn precision_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    ppv_score(y_true, y_pred, average, config)
}

pub fn recall_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    tpr_score(y_true, y_pred, average, config)
}

/// F1 score with a confidence interval (bootstrap only)
pub fn f1_score(
    y_true: &[f64],
    y_pred: &[f64],
    average: Average,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    classification_score(ClassificationMetric::F1, y_true, y_pred, average, config)
}

/// ROC AUC with a confidence interval; see [`estimate_auc_ci`]
pub fn roc_auc_score(
    y_true: &[f64],
    y_score: &[f64],
    sample_weight: Option<&[f64]>,
    config: &EstimationConfig,
) -> Result<MetricEstimate> {
    estimate_auc_ci(y_true, y_score, sample_weight, config)
}
