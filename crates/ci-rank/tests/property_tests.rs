//! Property tests for midrank invariants

use approx::assert_abs_diff_eq;
use ci_rank::{auc_point_estimate, compute_midrank, compute_midrank_weight, delong_roc_variance};
use proptest::prelude::*;

proptest! {
    #[test]
    fn midrank_length_and_sum(values in prop::collection::vec(-50i32..50, 0..200)) {
        let ranks = compute_midrank(&values).unwrap();
        let n = values.len() as f64;
        prop_assert_eq!(ranks.len(), values.len());
        prop_assert!((ranks.iter().sum::<f64>() - n * (n + 1.0) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn midrank_of_increasing_sequence(n in 1usize..100) {
        let values: Vec<f64> = (0..n).map(|i| i as f64 * 0.5 - 3.0).collect();
        let ranks = compute_midrank(&values).unwrap();
        for (i, r) in ranks.iter().enumerate() {
            prop_assert_eq!(*r, (i + 1) as f64);
        }
    }

    #[test]
    fn tie_groups_share_one_rank(values in prop::collection::vec(0u8..6, 1..100)) {
        let ranks = compute_midrank(&values).unwrap();
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] == values[j] {
                    prop_assert_eq!(ranks[i], ranks[j]);
                } else if values[i] < values[j] {
                    prop_assert!(ranks[i] < ranks[j]);
                }
            }
        }
    }

    #[test]
    fn unit_weights_reduce_to_plain_midrank(values in prop::collection::vec(-1.0e3f64..1.0e3, 0..150)) {
        let plain = compute_midrank(&values).unwrap();
        let weighted = compute_midrank_weight(&values, &vec![1.0; values.len()]).unwrap();
        for (p, w) in plain.iter().zip(&weighted) {
            prop_assert!((p - w).abs() < 1e-6);
        }
    }

    #[test]
    fn weighted_midranks_sum_to_weighted_total(
        rows in prop::collection::vec((0u8..8, 0.0f64..5.0), 1..100)
    ) {
        let values: Vec<u8> = rows.iter().map(|r| r.0).collect();
        let weights: Vec<f64> = rows.iter().map(|r| r.1).collect();
        let ranks = compute_midrank_weight(&values, &weights).unwrap();
        // Sum over groups of W_group * (W_before + (W_group + 1)/2) = (W^2 + W)/2
        let total: f64 = weights.iter().sum();
        let weighted_sum: f64 = ranks.iter().zip(&weights).map(|(r, w)| r * w).sum();
        prop_assert!((weighted_sum - (total * total + total) / 2.0).abs() < 1e-6 * (1.0 + total * total));
    }

    #[test]
    fn auc_is_a_probability(
        rows in prop::collection::vec((any::<bool>(), 0u8..10), 4..80)
    ) {
        let mut y_true: Vec<f64> = rows.iter().map(|r| if r.0 { 1.0 } else { 0.0 }).collect();
        let y_score: Vec<f64> = rows.iter().map(|r| r.1 as f64).collect();
        y_true[0] = 1.0;
        y_true[1] = 0.0;
        let auc = auc_point_estimate(&y_true, &y_score, None).unwrap();
        prop_assert!((0.0..=1.0).contains(&auc));

        // Negating the scores reflects the AUC
        let flipped: Vec<f64> = y_score.iter().map(|s| -s).collect();
        let auc_flipped = auc_point_estimate(&y_true, &flipped, None).unwrap();
        prop_assert!((auc + auc_flipped - 1.0).abs() < 1e-9);
    }
}

#[test]
fn delong_variance_shrinks_with_sample_size() {
    let base_true = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0];
    let base_pred = [0.1, 0.3, 0.6, 0.2, 0.7, 0.4, 0.9, 0.8, 0.35];

    let small = delong_roc_variance(&base_true, &base_pred, None).unwrap();

    let big_true: Vec<f64> = base_true.iter().cycle().take(90).copied().collect();
    let big_pred: Vec<f64> = base_pred.iter().cycle().take(90).copied().collect();
    let big = delong_roc_variance(&big_true, &big_pred, None).unwrap();

    assert_abs_diff_eq!(small.auc, big.auc, epsilon = 1e-12);
    assert!(big.variance < small.variance);
}
