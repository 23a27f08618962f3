use crate::{CostFunction, FeatureTable, TreeError, TreeResult};
use ordered_float::OrderedFloat;
use rayon::prelude::{IntoParallelIterator, ParallelIterator};
use std::fmt;
use std::str::FromStr;

/// Strategy used to find the split of a node.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SplitFunction {
    /// Exhaustive search over every observed value of every numerical feature.
    BestSplitNumerical,
}

impl SplitFunction {
    pub const ALL: [SplitFunction; 1] = [SplitFunction::BestSplitNumerical];

    pub fn name(self) -> &'static str {
        match self {
            SplitFunction::BestSplitNumerical => "best_split_numerical",
        }
    }

    pub fn from_name(name: &str) -> TreeResult<SplitFunction> {
        Self::ALL
            .iter()
            .cloned()
            .find(|f| f.name() == name)
            .ok_or_else(|| TreeError::UnknownFunction {
                kind: "split",
                name: name.to_string(),
            })
    }

    /// Find the split of the rows `indices`, or `None` if every candidate leaves a side empty.
    pub(crate) fn find(
        self,
        features: &FeatureTable,
        target: &[f64],
        indices: &[usize],
        cost: CostFunction,
        parallel: bool,
    ) -> Option<SplitResult> {
        match self {
            SplitFunction::BestSplitNumerical => {
                best_split_numerical(features, target, indices, cost, parallel)
            }
        }
    }

    /// Best `(feature, threshold)` over all the rows of `features`.
    pub fn select(
        self,
        features: &FeatureTable,
        target: &[f64],
        cost: CostFunction,
    ) -> TreeResult<Option<(String, f64)>> {
        crate::data::check_lengths(features, target)?;
        let indices: Vec<usize> = (0..target.len()).collect();
        Ok(self
            .find(features, target, &indices, cost, false)
            .map(|result| (features.names()[result.feature_id].clone(), result.threshold)))
    }
}

impl Default for SplitFunction {
    fn default() -> Self {
        SplitFunction::BestSplitNumerical
    }
}

impl FromStr for SplitFunction {
    type Err = TreeError;
    fn from_str(s: &str) -> TreeResult<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for SplitFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Store the result of a successful split on a node
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SplitResult {
    pub(crate) feature_id: usize,
    pub(crate) threshold: f64,
    /// Cost of the two sides, weighted by their number of rows
    pub(crate) cost: f64,
}

/// Best threshold of one feature, as `(threshold, weighted cost)`.
fn calc_cost_feature(
    column: &[f64],
    target: &[f64],
    indices: &[usize],
    cost: CostFunction,
) -> Option<(f64, f64)> {
    let mut sorted_indices = indices.to_vec();
    // Sorted values give the candidate thresholds
    sorted_indices.sort_by_key(|&row_id| OrderedFloat(column[row_id]));

    let n_total = sorted_indices.len() as f64;
    let mut left = Vec::with_capacity(sorted_indices.len());
    let mut right = Vec::with_capacity(sorted_indices.len());
    let mut best: Option<(f64, f64)> = None;

    // A threshold is the last occurrence of a value; the largest value would leave the right empty
    for idx in 0..sorted_indices.len().saturating_sub(1) {
        let val = column[sorted_indices[idx]];
        if val == column[sorted_indices[idx + 1]] {
            continue;
        }
        // Both sides keep the order of `indices`, so a partition costs the same whatever
        // the feature producing it
        left.clear();
        right.clear();
        for &row_id in indices {
            if column[row_id] <= val {
                left.push(target[row_id]);
            } else {
                right.push(target[row_id]);
            }
        }
        let current_cost = (left.len() as f64 * cost.cost(&left)
            + right.len() as f64 * cost.cost(&right))
            / n_total;

        let is_better = best.map_or(true, |(_, best_cost)| current_cost < best_cost);
        if is_better {
            best = Some((val, current_cost));
        }
    }
    best
}

/// Exhaustive search of the split minimizing the weighted cost of the two sides.
///
/// Every distinct value of every feature is a candidate threshold, rows go left when
/// `value <= threshold`. Candidates leaving one side empty are skipped. Ties go to the
/// first feature, then to the smallest threshold.
pub(crate) fn best_split_numerical(
    features: &FeatureTable,
    target: &[f64],
    indices: &[usize],
    cost: CostFunction,
    parallel: bool,
) -> Option<SplitResult> {
    let calc = |feature_id: usize| {
        calc_cost_feature(features.column_by_id(feature_id), target, indices, cost).map(
            |(threshold, weighted_cost)| SplitResult {
                feature_id,
                threshold,
                cost: weighted_cost,
            },
        )
    };
    // Results are collected in feature order so the reduction does not depend on scheduling
    let results: Vec<Option<SplitResult>> = if parallel {
        (0..features.n_cols()).into_par_iter().map(calc).collect()
    } else {
        (0..features.n_cols()).map(calc).collect()
    };

    let mut best: Option<SplitResult> = None;
    for result in results.into_iter().flatten() {
        let is_better = best.as_ref().map_or(true, |b| result.cost < b.cost);
        if is_better {
            best = Some(result);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: Vec<Vec<f64>>) -> FeatureTable {
        let names: Vec<String> = (0..columns.len()).map(|i| format!("f{}", i)).collect();
        FeatureTable::from_columns(names, columns).expect("valid table")
    }

    #[test]
    fn test_perfect_separation() {
        let features = table(vec![vec![1., 2., 3., 4., 5., 6.]]);
        let target = vec![1., 1., 1., 10., 10., 10.];
        let best = SplitFunction::BestSplitNumerical
            .select(&features, &target, CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, Some(("f0".to_string(), 3.)));

        let indices: Vec<_> = (0..6).collect();
        let result = best_split_numerical(
            &features,
            &target,
            &indices,
            CostFunction::MeanSquaredError,
            false,
        )
        .expect("split");
        assert_eq!(result.cost, 0.);
    }

    #[test]
    fn test_unsorted_rows() {
        let features = table(vec![vec![5., 1., 6., 3., 2., 4.]]);
        let target = vec![10., 1., 10., 1., 1., 10.];
        let best = SplitFunction::BestSplitNumerical
            .select(&features, &target, CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, Some(("f0".to_string(), 3.)));
    }

    #[test]
    fn test_best_feature() {
        // f0 is noise, f1 separates perfectly
        let features = table(vec![vec![1., 2., 1., 2.], vec![0., 0., 1., 1.]]);
        let target = vec![5., 5., 7., 7.];
        let best = SplitFunction::BestSplitNumerical
            .select(&features, &target, CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, Some(("f1".to_string(), 0.)));
    }

    #[test]
    fn test_ties_first_feature_smallest_threshold() {
        // Both features are identical: the first one wins
        let features = table(vec![vec![1., 2., 3., 4.], vec![1., 2., 3., 4.]]);
        // Constant target: every candidate costs 0
        let target = vec![2., 2., 2., 2.];
        let best = SplitFunction::BestSplitNumerical
            .select(&features, &target, CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, Some(("f0".to_string(), 1.)));
    }

    #[test]
    fn test_ties_same_partition_other_row_order() {
        // Both features send rows 0, 1, 2 to the left, but f1 sorts them in reverse order
        let features = table(vec![
            vec![1., 1., 1., 2., 2., 2.],
            vec![1.5, 1.4, 1.3, 2., 2., 2.],
        ]);
        let values = [0.1, 0.2, 0.3, 0.7, 1.1, 1.3, 2.9, 3.7, 10.1, 0.01];
        for &a in values.iter() {
            for &b in values.iter() {
                for &c in values.iter() {
                    let target = vec![a, b, c, 100., 100., 100.];
                    let best = SplitFunction::BestSplitNumerical
                        .select(&features, &target, CostFunction::MeanSquaredError)
                        .expect("valid data");
                    assert_eq!(
                        best,
                        Some(("f0".to_string(), 1.)),
                        "target {:?}",
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_split() {
        let features = table(vec![vec![3.; 10]]);
        let target: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let best = SplitFunction::BestSplitNumerical
            .select(&features, &target, CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, None);

        let single = table(vec![vec![1.]]);
        let best = SplitFunction::BestSplitNumerical
            .select(&single, &[1.], CostFunction::MeanSquaredError)
            .expect("valid data");
        assert_eq!(best, None);
    }

    #[test]
    fn test_parallel_same_result() {
        let columns: Vec<Vec<f64>> = (0..5)
            .map(|c| (0..40).map(|r| ((r * (c + 3)) % 7) as f64).collect())
            .collect();
        let target: Vec<f64> = (0..40).map(|r| ((r * r) % 11) as f64).collect();
        let features = table(columns);
        let indices: Vec<_> = (0..40).collect();
        let seq = best_split_numerical(
            &features,
            &target,
            &indices,
            CostFunction::MeanSquaredError,
            false,
        );
        let par = best_split_numerical(
            &features,
            &target,
            &indices,
            CostFunction::MeanSquaredError,
            true,
        );
        assert_eq!(seq, par);
    }

    #[test]
    fn test_registry() {
        assert_eq!(
            SplitFunction::from_name("best_split_numerical").expect("registered"),
            SplitFunction::BestSplitNumerical
        );
        match SplitFunction::from_name("best_split_categorical") {
            Err(TreeError::UnknownFunction { kind, .. }) => assert_eq!(kind, "split"),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
