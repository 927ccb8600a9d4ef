//! DeLong estimator for the ROC AUC and its variance
//!
//! The AUC equals the Mann-Whitney U statistic scaled to [0, 1]. Following
//! DeLong, DeLong & Clarke-Pearson (1988) in the midrank formulation of
//! Sun & Xu (2014), each positive and each negative gets a *placement
//! value*: the share of the opposite class ranked below it, ties counting
//! one half. The placements average to the AUC and their sample variances
//! give its asymptotic variance.
//!
//! # Example
//!
//! ```rust
//! use ci_rank::delong_roc_variance;
//!
//! let y_true = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
//! let y_score = [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0];
//!
//! let est = delong_roc_variance(&y_true, &y_score, None).unwrap();
//! assert!((est.auc - 0.775).abs() < 1e-12);
//! assert!((est.variance - 0.025625).abs() < 1e-12);
//! ```

use crate::midrank::{compute_midrank, compute_midrank_weight};
use ci_core::{check_paired_lengths, Error, Result};
use tracing::{debug, instrument};

/// Scores (and weights) of the two label-defined groups
#[derive(Debug, Clone, Default)]
pub struct ClassSplit {
    pub positive_scores: Vec<f64>,
    pub negative_scores: Vec<f64>,
    pub positive_weights: Option<Vec<f64>>,
    pub negative_weights: Option<Vec<f64>>,
}

impl ClassSplit {
    /// Partition scores by binary label, carrying weights along
    ///
    /// # Errors
    /// `Error::InputShape` on empty or mismatched arrays,
    /// `Error::InvalidInput` for labels outside {0, 1}, NaN scores or
    /// negative weights.
    pub fn from_labels(y_true: &[f64], y_score: &[f64], sample_weight: Option<&[f64]>) -> Result<Self> {
        check_paired_lengths(y_true.len(), y_score.len(), sample_weight.map(<[f64]>::len))?;

        let mut split = Self::default();
        let mut pos_w = Vec::new();
        let mut neg_w = Vec::new();

        for (i, (&label, &score)) in y_true.iter().zip(y_score).enumerate() {
            if score.is_nan() {
                return Err(Error::InvalidInput(format!("Score at position {i} is NaN")));
            }
            let weight = sample_weight.map(|w| w[i]);
            if let Some(w) = weight {
                if !w.is_finite() || w < 0.0 {
                    return Err(Error::InvalidInput(format!(
                        "Sample weight at position {i} must be finite and non-negative, got {w}"
                    )));
                }
            }
            if label == 1.0 {
                split.positive_scores.push(score);
                pos_w.extend(weight);
            } else if label == 0.0 {
                split.negative_scores.push(score);
                neg_w.extend(weight);
            } else {
                return Err(Error::InvalidInput(format!(
                    "Binary labels must be 0 or 1, got {label} at position {i}"
                )));
            }
        }

        if sample_weight.is_some() {
            split.positive_weights = Some(pos_w);
            split.negative_weights = Some(neg_w);
        }
        Ok(split)
    }

    pub fn n_positive(&self) -> usize {
        self.positive_scores.len()
    }

    pub fn n_negative(&self) -> usize {
        self.negative_scores.len()
    }
}

/// Placement values of both groups and the AUC they imply
#[derive(Debug, Clone)]
struct Placements {
    /// Per positive: weighted share of negatives ranked below it
    v10: Vec<f64>,
    /// Per negative: weighted share of positives ranked below it
    v01: Vec<f64>,
    auc: f64,
}

fn placements(split: &ClassSplit) -> Result<Placements> {
    let m = split.n_positive();
    let n = split.n_negative();
    if m == 0 || n == 0 {
        return Err(Error::DegenerateInput(format!(
            "AUC is undefined with {m} positive and {n} negative samples"
        )));
    }

    let combined: Vec<f64> = split
        .positive_scores
        .iter()
        .chain(&split.negative_scores)
        .copied()
        .collect();

    match (&split.positive_weights, &split.negative_weights) {
        (Some(pw), Some(nw)) => {
            let total_pos: f64 = pw.iter().sum();
            let total_neg: f64 = nw.iter().sum();
            if total_pos <= 0.0 || total_neg <= 0.0 {
                return Err(Error::DegenerateInput(format!(
                    "AUC is undefined with total positive weight {total_pos} and negative weight {total_neg}"
                )));
            }
            let combined_w: Vec<f64> = pw.iter().chain(nw).copied().collect();

            let tx = compute_midrank_weight(&split.positive_scores, pw)?;
            let ty = compute_midrank_weight(&split.negative_scores, nw)?;
            let tz = compute_midrank_weight(&combined, &combined_w)?;

            let v10: Vec<f64> = (0..m).map(|i| (tz[i] - tx[i]) / total_neg).collect();
            let v01: Vec<f64> = (0..n).map(|j| (tz[m + j] - ty[j]) / total_pos).collect();
            let auc = v10.iter().zip(pw).map(|(v, w)| v * w).sum::<f64>() / total_pos;
            Ok(Placements { v10, v01, auc })
        }
        _ => {
            let tx = compute_midrank(&split.positive_scores)?;
            let ty = compute_midrank(&split.negative_scores)?;
            let tz = compute_midrank(&combined)?;

            let v10: Vec<f64> = (0..m).map(|i| (tz[i] - tx[i]) / n as f64).collect();
            let v01: Vec<f64> = (0..n).map(|j| (tz[m + j] - ty[j]) / m as f64).collect();
            let auc = mean(&v10);
            Ok(Placements { v10, v01, auc })
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (n - 1 denominator)
fn sample_variance(values: &[f64]) -> f64 {
    let mu = mean(values);
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Variance of the (weighted) mean of one group's placements
///
/// With weights, deviations are taken from the weighted mean and scaled by
/// reliability weights, and the group size becomes the effective count
/// `(Σw)² / Σw²`. Unit weights give `sample_variance / len`.
fn variance_of_mean(values: &[f64], weights: Option<&[f64]>, group: &str) -> Result<f64> {
    let Some(w) = weights else {
        return Ok(sample_variance(values) / values.len() as f64);
    };

    let sw: f64 = w.iter().sum();
    let sw2: f64 = w.iter().map(|x| x * x).sum();
    let denom = sw - sw2 / sw;
    if sw <= 0.0 || denom <= sw * 1e-12 {
        return Err(Error::DegenerateInput(format!(
            "DeLong variance needs at least 2 {group} samples with positive weight"
        )));
    }

    let mu = values.iter().zip(w).map(|(v, wi)| v * wi).sum::<f64>() / sw;
    let ss: f64 = values.iter().zip(w).map(|(v, wi)| wi * (v - mu).powi(2)).sum();
    let n_eff = sw * sw / sw2;
    Ok(ss / denom / n_eff)
}

/// AUC point estimate and DeLong variance
#[derive(Debug, Clone)]
pub struct DeLongEstimate {
    /// Area under the ROC curve
    pub auc: f64,
    /// Asymptotic variance of the AUC estimator
    pub variance: f64,
    /// Placement values of the positives (weighted mean equals the AUC)
    pub v10: Vec<f64>,
    /// Placement values of the negatives (weighted mean equals 1 - AUC)
    pub v01: Vec<f64>,
}

impl DeLongEstimate {
    pub fn std_error(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn n_positive(&self) -> usize {
        self.v10.len()
    }

    pub fn n_negative(&self) -> usize {
        self.v01.len()
    }
}

/// DeLong AUC and variance for pre-split groups
///
/// Variance is `Var(V10)/m + Var(V01)/n` with unbiased sample variances.
/// With sample weights the variances are weighted around the weighted means
/// and `m`, `n` are the effective group sizes, so zero-weight rows have no
/// influence.
///
/// # Errors
/// `Error::DegenerateInput` unless both groups have at least two members
/// (two with positive weight when weighted).
#[instrument(skip(split), fields(m = split.n_positive(), n = split.n_negative()))]
pub fn delong_auc_variance(split: &ClassSplit) -> Result<DeLongEstimate> {
    let m = split.n_positive();
    let n = split.n_negative();
    if m < 2 || n < 2 {
        return Err(Error::DegenerateInput(format!(
            "DeLong variance needs at least 2 positive and 2 negative samples, got {m} and {n}"
        )));
    }

    let Placements { v10, v01, auc } = placements(split)?;
    let variance = variance_of_mean(&v10, split.positive_weights.as_deref(), "positive")?
        + variance_of_mean(&v01, split.negative_weights.as_deref(), "negative")?;

    debug!("DeLong: auc={:.6}, variance={:.6e}", auc, variance);

    Ok(DeLongEstimate {
        auc,
        variance,
        v10,
        v01,
    })
}

/// DeLong AUC and variance from binary labels and scores
pub fn delong_roc_variance(
    y_true: &[f64],
    y_score: &[f64],
    sample_weight: Option<&[f64]>,
) -> Result<DeLongEstimate> {
    let split = ClassSplit::from_labels(y_true, y_score, sample_weight)?;
    delong_auc_variance(&split)
}

/// ROC AUC point estimate from binary labels and scores
///
/// Only requires one member per class, so it is usable inside resampling
/// loops where the variance is not needed.
///
/// # Errors
/// `Error::DegenerateInput` if a class is absent (or has zero total weight).
pub fn auc_point_estimate(y_true: &[f64], y_score: &[f64], sample_weight: Option<&[f64]>) -> Result<f64> {
    let split = ClassSplit::from_labels(y_true, y_score, sample_weight)?;
    Ok(placements(&split)?.auc)
}
