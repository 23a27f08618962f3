use crate::{
    mean_indices, CostFunction, FeatureRow, FeatureTable, ModelType, SplitFunction, TreeError,
    TreeResult, DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES,
};
use log::debug;
use std::fmt;

/// Value stored in a leaf, and returned by a prediction.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum Prediction {
    /// Mean of the target, for a regression
    Value(f64),
    /// Mean of the target above the threshold, for a classifier
    Class(bool),
}

impl Prediction {
    /// Classes are mapped to 1 and 0.
    pub fn as_f64(self) -> f64 {
        match self {
            Prediction::Value(val) => val,
            Prediction::Class(true) => 1.,
            Prediction::Class(false) => 0.,
        }
    }

    /// Values are true above 0.5.
    pub fn as_bool(self) -> bool {
        match self {
            Prediction::Value(val) => val > 0.5,
            Prediction::Class(class) => class,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Prediction::Value(val) => write!(f, "{}", val),
            Prediction::Class(class) => write!(f, "{}", class),
        }
    }
}

/// Parameters of the tree induction, resolved from a [crate::DecisionTreeConfig].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TreeParams {
    pub split_function: SplitFunction,
    pub cost_function: CostFunction,
    pub model_type: ModelType,
    /// Nodes with fewer rows become leaves
    pub min_samples: usize,
    /// The root is at depth 0, nodes deeper than this become leaves
    pub max_depth: usize,
    /// Build the subtrees and search the features with rayon
    pub parallel: bool,
}

impl TreeParams {
    pub fn new(model_type: ModelType) -> Self {
        TreeParams {
            split_function: SplitFunction::default(),
            cost_function: CostFunction::default(),
            model_type,
            min_samples: DEFAULT_MIN_SAMPLES,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SplitNode {
    left_child: Box<Node>,
    right_child: Box<Node>,
    feature: String,
    threshold: f64,
}

impl SplitNode {
    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rows with `feature <= threshold`
    pub fn left(&self) -> &Node {
        &self.left_child
    }

    /// Rows with `feature > threshold`
    pub fn right(&self) -> &Node {
        &self.right_child
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeafNode {
    val: Prediction,
}

impl LeafNode {
    pub fn value(&self) -> Prediction {
        self.val
    }
}

/// Binary decision tree. Each node owns its children, and is never modified once built.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Node {
    Split(SplitNode),
    Leaf(LeafNode),
}

impl Node {
    /// Recursive partitioning of the rows `indices` of the features.
    ///
    /// A node becomes a leaf if it is deeper than `max_depth`, if it has fewer than
    /// `min_samples` rows, if its target is constant, or if no split leaves rows on both sides.
    /// `indices` must not be empty.
    pub(crate) fn build(
        features: &FeatureTable,
        target: &[f64],
        indices: &[usize],
        depth: usize,
        params: &TreeParams,
    ) -> Node {
        macro_rules! return_leaf {
            ($reason: expr) => {{
                let val = params.model_type.leaf_value(mean_indices(target, indices));
                debug!(
                    "leaf at depth {} with {} rows ({}): {}",
                    depth,
                    indices.len(),
                    $reason,
                    val
                );
                return Node::Leaf(LeafNode { val });
            }};
        }

        if depth > params.max_depth {
            return_leaf!("max depth");
        }
        if indices.len() < params.min_samples {
            return_leaf!("min samples");
        }
        // Any split of a constant target would give children with the same value
        let first = target[indices[0]];
        if indices.iter().all(|&i| target[i] == first) {
            return_leaf!("constant target");
        }

        let best_result = params.split_function.find(
            features,
            target,
            indices,
            params.cost_function,
            params.parallel,
        );
        let best_result = match best_result {
            Some(e) => e,
            None => return_leaf!("no split found"),
        };

        let column = features.column_by_id(best_result.feature_id);
        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| column[i] <= best_result.threshold);
        let feature = features.names()[best_result.feature_id].clone();
        debug!(
            "split at depth {} on {} <= {} (cost {:.6}): {} left, {} right",
            depth,
            feature,
            best_result.threshold,
            best_result.cost,
            left_indices.len(),
            right_indices.len()
        );

        let build_child = |child_indices: &[usize]| {
            Box::new(Node::build(
                features,
                target,
                child_indices,
                depth + 1,
                params,
            ))
        };
        let (left_child, right_child) = if params.parallel {
            rayon::join(|| build_child(&left_indices), || build_child(&right_indices))
        } else {
            (build_child(&left_indices), build_child(&right_indices))
        };

        Node::Split(SplitNode {
            left_child,
            right_child,
            feature,
            threshold: best_result.threshold,
        })
    }

    /// Follow the splits down to a leaf.
    pub fn predict<R: FeatureRow + ?Sized>(&self, row: &R) -> TreeResult<Prediction> {
        let mut current = self;
        loop {
            match current {
                Node::Split(split) => {
                    let val = row
                        .feature(&split.feature)
                        .ok_or_else(|| TreeError::MissingFeature(split.feature.clone()))?;
                    current = if val <= split.threshold {
                        &split.left_child
                    } else {
                        &split.right_child
                    };
                }
                Node::Leaf(leaf) => return Ok(leaf.val),
            }
        }
    }

    pub fn predict_table(&self, features: &FeatureTable) -> TreeResult<Vec<Prediction>> {
        features.rows().map(|row| self.predict(&row)).collect()
    }

    /// Number of split levels below this node: 0 for a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Node::Split(split) => 1 + split.left_child.depth().max(split.right_child.depth()),
            Node::Leaf(_) => 0,
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Split(split) => split.left_child.n_leaves() + split.right_child.n_leaves(),
            Node::Leaf(_) => 1,
        }
    }

    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Split(split) => 1 + split.left_child.n_nodes() + split.right_child.n_nodes(),
            Node::Leaf(_) => 1,
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            Node::Split(split) => {
                writeln!(f, "{}{} <= {}", pad, split.feature, split.threshold)?;
                split.left_child.fmt_indent(f, indent + 1)?;
                writeln!(f, "{}{} > {}", pad, split.feature, split.threshold)?;
                split.right_child.fmt_indent(f, indent + 1)
            }
            Node::Leaf(leaf) => writeln!(f, "{}-> {}", pad, leaf.val),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (FeatureTable, Vec<f64>) {
        let features =
            FeatureTable::from_columns(vec!["x"], vec![vec![1., 2., 3., 4., 5., 6.]])
                .expect("valid table");
        (features, vec![1., 1., 1., 10., 10., 10.])
    }

    fn build(features: &FeatureTable, target: &[f64], params: &TreeParams) -> Node {
        let indices: Vec<_> = (0..target.len()).collect();
        Node::build(features, target, &indices, 0, params)
    }

    #[test]
    fn test_step_regression() {
        let (features, target) = step_data();
        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 1;
        params.max_depth = 5;
        let tree = build(&features, &target, &params);

        match &tree {
            Node::Split(split) => {
                assert_eq!(split.feature(), "x");
                assert_eq!(split.threshold(), 3.);
                assert_eq!(
                    split.left(),
                    &Node::Leaf(LeafNode {
                        val: Prediction::Value(1.)
                    })
                );
                assert_eq!(
                    split.right(),
                    &Node::Leaf(LeafNode {
                        val: Prediction::Value(10.)
                    })
                );
            }
            Node::Leaf(_) => panic!("expected a split"),
        }
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
        assert_eq!(tree.n_nodes(), 3);

        let row: &[(&str, f64)] = &[("x", 2.)];
        assert_eq!(tree.predict(row).expect("x present"), Prediction::Value(1.));
        let row: &[(&str, f64)] = &[("x", 5.)];
        assert_eq!(tree.predict(row).expect("x present"), Prediction::Value(10.));
    }

    #[test]
    fn test_step_classifier() {
        let (features, target) = step_data();
        let mut params = TreeParams::new(ModelType::Classifier { threshold: 5. });
        params.min_samples = 1;
        let tree = build(&features, &target, &params);
        let predictions = tree.predict_table(&features).expect("x present");
        assert_eq!(
            predictions,
            vec![
                Prediction::Class(false),
                Prediction::Class(false),
                Prediction::Class(false),
                Prediction::Class(true),
                Prediction::Class(true),
                Prediction::Class(true),
            ]
        );
    }

    #[test]
    fn test_min_samples() {
        // With the default min_samples of 5, the 3-row sides become leaves
        let (features, target) = step_data();
        let tree = build(&features, &target, &TreeParams::new(ModelType::Regression));
        assert_eq!(tree.n_leaves(), 2);

        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 7;
        let tree = build(&features, &target, &params);
        assert_eq!(
            tree,
            Node::Leaf(LeafNode {
                val: Prediction::Value(5.5)
            })
        );
    }

    #[test]
    fn test_max_depth() {
        let x: Vec<f64> = (0..64).map(|i| i as f64).collect();
        let features = FeatureTable::from_columns(vec!["x"], vec![x.clone()]).expect("valid");
        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 1;
        params.max_depth = 2;
        let tree = build(&features, &x, &params);
        // Splits at depth 0, 1 and 2, leaves at depth 3
        assert_eq!(tree.depth(), 3);

        params.max_depth = 0;
        let tree = build(&features, &x, &params);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_constant_feature() {
        let features = FeatureTable::from_columns(vec!["x"], vec![vec![3.; 10]]).expect("valid");
        let target: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 1;
        let tree = build(&features, &target, &params);
        assert_eq!(
            tree,
            Node::Leaf(LeafNode {
                val: Prediction::Value(4.5)
            })
        );
    }

    #[test]
    fn test_missing_feature() {
        let (features, target) = step_data();
        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 1;
        let tree = build(&features, &target, &params);
        let row: &[(&str, f64)] = &[("y", 2.)];
        match tree.predict(row) {
            Err(TreeError::MissingFeature(name)) => assert_eq!(name, "x"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let (features, target) = step_data();
        let mut params = TreeParams::new(ModelType::Regression);
        params.min_samples = 1;
        let tree = build(&features, &target, &params);
        assert_eq!(tree.to_string(), "x <= 3\n  -> 1\nx > 3\n  -> 10\n");
    }

    #[test]
    fn test_prediction_coercion() {
        assert_eq!(Prediction::Class(true).as_f64(), 1.);
        assert!(!Prediction::Class(false).as_bool());
        assert!(Prediction::Value(0.8).as_bool());
        assert!(!Prediction::Value(0.2).as_bool());
    }
}
