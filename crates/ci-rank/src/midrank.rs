//! Tie-aware rank statistics
//!
//! Midranks assign every member of a run of equal values the mean of the
//! 1-indexed positions the run occupies in ascending order. The weighted
//! variant measures positions in cumulative weight instead of counts.

use ci_core::{Error, Numeric, Result};
use std::cmp::Ordering;

/// Ascending sort permutation, rejecting values that cannot be ordered
fn sort_order<T: Numeric>(values: &[T]) -> Result<Vec<usize>> {
    if let Some(pos) = values.iter().position(|v| !v.is_comparable()) {
        return Err(Error::InvalidInput(format!(
            "Cannot rank NaN value at position {pos}"
        )));
    }
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    Ok(order)
}

/// Walk the sorted order and yield maximal runs of equal values as `start..end`
fn tie_groups<'a, T: Numeric>(
    values: &'a [T],
    order: &'a [usize],
) -> impl Iterator<Item = std::ops::Range<usize>> + 'a {
    let mut i = 0;
    std::iter::from_fn(move || {
        if i >= order.len() {
            return None;
        }
        let start = i;
        let pivot = values[order[start]];
        while i < order.len() && values[order[i]] == pivot {
            i += 1;
        }
        Some(start..i)
    })
}

/// 1-indexed midranks of `values` under ascending order
///
/// A run of `k` equal values starting at sorted position `i` (0-indexed)
/// receives `(i + 1 + i + k) / 2`. Ranks are returned in the original order
/// of `values`. Empty input yields an empty vector.
///
/// # Errors
/// `Error::InvalidInput` if a value is NaN.
pub fn compute_midrank<T: Numeric>(values: &[T]) -> Result<Vec<f64>> {
    let order = sort_order(values)?;
    let mut ranks = vec![0.0; values.len()];

    for group in tie_groups(values, &order) {
        let rank = 0.5 * (group.start + 1 + group.end) as f64;
        for &idx in &order[group] {
            ranks[idx] = rank;
        }
    }

    Ok(ranks)
}

/// Weighted midranks: positions measured in cumulative sample weight
///
/// A tie-group preceded by total weight `W_before` and carrying total
/// weight `W_group` receives `W_before + (W_group + 1) / 2`. With unit
/// weights this is exactly [`compute_midrank`].
///
/// # Errors
/// `Error::InputShape` on a length mismatch, `Error::InvalidInput` for NaN
/// values or negative/non-finite weights.
pub fn compute_midrank_weight<T: Numeric, W: Numeric>(values: &[T], weights: &[W]) -> Result<Vec<f64>> {
    if weights.len() != values.len() {
        return Err(Error::size_mismatch(values.len(), weights.len(), "midrank weights"));
    }
    let weights: Vec<f64> = weights.iter().map(|w| w.to_f64_lossy()).collect();
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(Error::InvalidInput(format!(
            "Rank weights must be finite and non-negative, got {bad}"
        )));
    }

    let order = sort_order(values)?;
    let mut ranks = vec![0.0; values.len()];
    let mut weight_before = 0.0;

    for group in tie_groups(values, &order) {
        let members = &order[group];
        let group_weight: f64 = members.iter().map(|&idx| weights[idx]).sum();
        let rank = weight_before + 0.5 * (group_weight + 1.0);
        for &idx in members {
            ranks[idx] = rank;
        }
        weight_before += group_weight;
    }

    Ok(ranks)
}
