use crate::data::check_lengths;
use crate::{
    CostFunction, FeatureRow, FeatureTable, Node, Prediction, SplitFunction, TreeError,
    TreeParams, TreeResult, DEFAULT_COST_FUNCTION, DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES,
    DEFAULT_SPLIT_FUNCTION,
};
use log::{info, warn};

/// What the leaves predict.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum ModelType {
    /// Mean of the target
    Regression,
    /// Whether the mean of the target is above the threshold
    Classifier { threshold: f64 },
}

impl ModelType {
    /// `threshold` is required for a classifier, and ignored for a regression.
    pub fn from_name(name: &str, threshold: Option<f64>) -> TreeResult<ModelType> {
        match name {
            "regression" => Ok(ModelType::Regression),
            "classifier" => threshold
                .map(|threshold| ModelType::Classifier { threshold })
                .ok_or(TreeError::MissingThreshold)?
                .check(),
            other => Err(TreeError::InvalidModelType(other.to_string())),
        }
    }

    /// A classifier threshold must be finite.
    pub fn check(self) -> TreeResult<ModelType> {
        match self {
            ModelType::Classifier { threshold } if !threshold.is_finite() => {
                Err(TreeError::InvalidParameter(format!(
                    "classifier threshold must be finite, got {}",
                    threshold
                )))
            }
            other => Ok(other),
        }
    }

    pub fn leaf_value(self, mean: f64) -> Prediction {
        match self {
            ModelType::Regression => Prediction::Value(mean),
            ModelType::Classifier { threshold } => Prediction::Class(mean > threshold),
        }
    }
}

/// User facing configuration of a [DecisionTreeModel].
///
/// Functions are selected by name, and checked when the model is created.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DecisionTreeConfig {
    pub split_function: String,
    pub cost_function: String,
    /// `regression` or `classifier`
    pub model_type: String,
    /// Required for a classifier
    pub threshold: Option<f64>,
    pub min_samples: usize,
    pub max_depth: usize,
    pub parallel: bool,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        DecisionTreeConfig {
            split_function: DEFAULT_SPLIT_FUNCTION.to_string(),
            cost_function: DEFAULT_COST_FUNCTION.to_string(),
            model_type: "regression".to_string(),
            threshold: None,
            min_samples: DEFAULT_MIN_SAMPLES,
            max_depth: DEFAULT_MAX_DEPTH,
            parallel: false,
        }
    }
}

impl DecisionTreeConfig {
    pub fn regression() -> Self {
        Self::default()
    }

    pub fn classifier(threshold: f64) -> Self {
        DecisionTreeConfig {
            model_type: "classifier".to_string(),
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    pub fn split_function(mut self, name: &str) -> Self {
        self.split_function = name.to_string();
        self
    }

    pub fn cost_function(mut self, name: &str) -> Self {
        self.cost_function = name.to_string();
        self
    }

    pub fn min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Resolve the names into the parameters of the tree.
    pub fn resolve(&self) -> TreeResult<TreeParams> {
        Ok(TreeParams {
            split_function: SplitFunction::from_name(&self.split_function)?,
            cost_function: CostFunction::from_name(&self.cost_function)?,
            model_type: ModelType::from_name(&self.model_type, self.threshold)?,
            min_samples: self.min_samples,
            max_depth: self.max_depth,
            parallel: self.parallel,
        })
    }
}

/// Decision tree for a regression or a thresholded classification.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DecisionTreeModel {
    params: TreeParams,
    tree: Option<Node>,
}

impl DecisionTreeModel {
    pub fn new(config: &DecisionTreeConfig) -> TreeResult<DecisionTreeModel> {
        Self::from_params(config.resolve()?)
    }

    pub fn from_params(params: TreeParams) -> TreeResult<DecisionTreeModel> {
        params.model_type.check()?;
        Ok(DecisionTreeModel { params, tree: None })
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    /// The built tree, if any.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }

    /// Build the tree from scratch, replacing any previous one.
    pub fn build(&mut self, features: &FeatureTable, target: &[f64]) -> TreeResult<&Node> {
        check_lengths(features, target)?;
        if target.is_empty() {
            return Err(TreeError::InvalidData(
                "cannot build a tree without rows".to_string(),
            ));
        }
        if let ModelType::Classifier { .. } = self.params.model_type {
            if target.iter().any(|&v| v != 0. && v != 1.) {
                warn!("classifier target contains values other than 0 and 1");
            }
        }

        let indices: Vec<usize> = (0..target.len()).collect();
        let tree = Node::build(features, target, &indices, 0, &self.params);
        info!(
            "built tree on {} rows and {} features: {} nodes, {} leaves, depth {}",
            target.len(),
            features.n_cols(),
            tree.n_nodes(),
            tree.n_leaves(),
            tree.depth()
        );
        Ok(self.tree.insert(tree))
    }

    fn built_tree(&self) -> TreeResult<&Node> {
        self.tree.as_ref().ok_or(TreeError::ModelNotBuilt)
    }

    pub fn predict_one<R: FeatureRow + ?Sized>(&self, row: &R) -> TreeResult<Prediction> {
        self.built_tree()?.predict(row)
    }

    /// Predictions in the order of the rows.
    pub fn predict_rows<R: FeatureRow>(&self, rows: &[R]) -> TreeResult<Vec<Prediction>> {
        let tree = self.built_tree()?;
        rows.iter().map(|row| tree.predict(row)).collect()
    }

    /// Predictions for every row of the table.
    pub fn predict(&self, features: &FeatureTable) -> TreeResult<Vec<Prediction>> {
        self.built_tree()?.predict_table(features)
    }
}
