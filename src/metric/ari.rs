//! Adjusted Rand Index between two partitions of the same items.

use crate::error::{CongruenceError, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Pair counts from comparing two partitions.
///
/// Each unordered pair of items is counted once: together in both
/// partitions, apart in both, or together in only one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairConfusion {
    /// Pairs grouped together in both partitions.
    pub together_both: u128,
    /// Pairs grouped together in `truth` only.
    pub together_truth_only: u128,
    /// Pairs grouped together in `pred` only.
    pub together_pred_only: u128,
    /// Pairs separated in both partitions.
    pub apart_both: u128,
}

/// Number of unordered pairs among `n` items.
fn comb2(n: u64) -> u128 {
    let n = n as u128;
    n * n.saturating_sub(1) / 2
}

/// Map labels to dense indices in order of first appearance.
fn encode<T: Hash + Eq>(labels: &[T]) -> (Vec<usize>, usize) {
    let mut index: HashMap<&T, usize> = HashMap::new();
    let codes = labels
        .iter()
        .map(|label| {
            let next = index.len();
            *index.entry(label).or_insert(next)
        })
        .collect();
    (codes, index.len())
}

/// Build the pair confusion counts for two label sequences.
///
/// Labels correspond positionally; only equality of labels matters.
pub fn pair_confusion<T: Hash + Eq, U: Hash + Eq>(truth: &[T], pred: &[U]) -> Result<PairConfusion> {
    if truth.len() != pred.len() {
        return Err(CongruenceError::LengthMismatch {
            expected: truth.len(),
            actual: pred.len(),
        });
    }

    let (a, n_a) = encode(truth);
    let (b, n_b) = encode(pred);

    let mut contingency: HashMap<(usize, usize), u64> = HashMap::new();
    let mut row_sums = vec![0u64; n_a];
    let mut col_sums = vec![0u64; n_b];
    for (&i, &j) in a.iter().zip(b.iter()) {
        *contingency.entry((i, j)).or_insert(0) += 1;
        row_sums[i] += 1;
        col_sums[j] += 1;
    }

    let sum_comb_cells: u128 = contingency.values().map(|&x| comb2(x)).sum();
    let sum_comb_rows: u128 = row_sums.iter().map(|&x| comb2(x)).sum();
    let sum_comb_cols: u128 = col_sums.iter().map(|&x| comb2(x)).sum();
    let total = comb2(truth.len() as u64);

    let together_both = sum_comb_cells;
    let together_truth_only = sum_comb_rows - sum_comb_cells;
    let together_pred_only = sum_comb_cols - sum_comb_cells;
    let apart_both = total - together_both - together_truth_only - together_pred_only;

    Ok(PairConfusion {
        together_both,
        together_truth_only,
        together_pred_only,
        apart_both,
    })
}

/// Adjusted Rand Index between two label sequences.
///
/// ARI = (index − expected index) / (max index − expected index), computed
/// from pair counts. Returns 1.0 when the partitions never disagree on a
/// pair (including identical all-singleton partitions and inputs with fewer
/// than two items), about 0.0 for independent partitions and negative values
/// for worse-than-chance agreement.
pub fn adjusted_rand_index<T: Hash + Eq, U: Hash + Eq>(truth: &[T], pred: &[U]) -> Result<f64> {
    let pc = pair_confusion(truth, pred)?;
    if pc.together_truth_only == 0 && pc.together_pred_only == 0 {
        return Ok(1.0);
    }

    let tp = pc.together_both as i128;
    let fn_ = pc.together_truth_only as i128;
    let fp = pc.together_pred_only as i128;
    let tn = pc.apart_both as i128;

    let numerator = 2 * (tp * tn - fn_ * fp);
    let denominator = (tp + fn_) * (fn_ + tn) + (tp + fp) * (fp + tn);
    Ok(numerator as f64 / denominator as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical() {
        let a = vec!["g1", "g1", "g2", "g2", "g3", "g3"];
        assert_eq!(adjusted_rand_index(&a, &a).unwrap(), 1.0);
    }

    #[test]
    fn test_relabeled() {
        let a = vec![0, 0, 0, 1, 1, 1];
        let b = vec!["x", "x", "x", "y", "y", "y"];
        assert_eq!(adjusted_rand_index(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_all_singletons_agree() {
        let a = vec!["g1", "g2"];
        let b = vec!["c1", "c2"];
        assert_eq!(adjusted_rand_index(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_known_values() {
        assert_relative_eq!(
            adjusted_rand_index(&[0, 0, 1, 1], &[0, 0, 1, 2]).unwrap(),
            4.0 / 7.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            adjusted_rand_index(&[0, 0, 1, 1], &[0, 1, 0, 1]).unwrap(),
            -0.5,
            epsilon = 1e-12
        );
        assert_eq!(adjusted_rand_index(&[0, 0, 0, 0], &[0, 1, 2, 3]).unwrap(), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = vec![0, 0, 1, 1, 2, 2, 2, 3];
        let b = vec![5, 5, 5, 6, 6, 7, 7, 7];
        assert_relative_eq!(
            adjusted_rand_index(&a, &b).unwrap(),
            adjusted_rand_index(&b, &a).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_independent_partitions() {
        let a = vec![0, 1, 0, 1, 0, 1, 0, 1];
        let b = vec![0, 0, 1, 1, 0, 0, 1, 1];
        assert_relative_eq!(adjusted_rand_index(&a, &b).unwrap(), -1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pair_confusion_totals() {
        let pc = pair_confusion(&[0, 0, 1, 1], &[0, 0, 1, 2]).unwrap();
        assert_eq!(pc.together_both, 1);
        assert_eq!(pc.together_truth_only, 1);
        assert_eq!(pc.together_pred_only, 0);
        assert_eq!(pc.apart_both, 4);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(adjusted_rand_index(&[0, 1], &[0]).is_err());
    }
}
