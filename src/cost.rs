use crate::{mean, variance, TreeError, TreeResult};
use std::fmt;
use std::str::FromStr;

/// Predictions are clipped to `[EPS, 1 - EPS]` before taking the log.
pub static BCE_EPS: f64 = 1e-15;

/// Impurity of a set of target values: the lower, the more homogeneous.
///
/// Every cost function is pure, never negative, and returns 0 on a single value.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Population variance of the values.
    MeanSquaredError,
    /// Binary cross-entropy of the values against their own mean.
    ///
    /// Meant for 0/1 targets: the values are clamped to `[0, 1]` first.
    BinaryCrossEntropy,
}

impl CostFunction {
    pub const ALL: [CostFunction; 2] = [
        CostFunction::MeanSquaredError,
        CostFunction::BinaryCrossEntropy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CostFunction::MeanSquaredError => "mean_squared_error",
            CostFunction::BinaryCrossEntropy => "binary_cross_entropy",
        }
    }

    pub fn from_name(name: &str) -> TreeResult<CostFunction> {
        Self::ALL
            .iter()
            .cloned()
            .find(|f| f.name() == name)
            .ok_or_else(|| TreeError::UnknownFunction {
                kind: "cost",
                name: name.to_string(),
            })
    }

    /// Values must not be empty.
    pub fn cost(self, values: &[f64]) -> f64 {
        debug_assert!(!values.is_empty());
        match self {
            CostFunction::MeanSquaredError => mean_squared_error(values),
            CostFunction::BinaryCrossEntropy => {
                let clamped: Vec<f64> = values.iter().map(|&v| v.max(0.).min(1.)).collect();
                let p = mean(&clamped);
                let predictions = vec![p; clamped.len()];
                binary_cross_entropy(&clamped, &predictions)
            }
        }
    }
}

impl Default for CostFunction {
    fn default() -> Self {
        CostFunction::MeanSquaredError
    }
}

impl FromStr for CostFunction {
    type Err = TreeError;
    fn from_str(s: &str) -> TreeResult<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean of the squared deviations to the mean of `values`.
pub fn mean_squared_error(values: &[f64]) -> f64 {
    variance(values)
}

/// Binary log loss `-mean(y * log(p) + (1 - y) * log(1 - p))`.
///
/// The target must be 0 or 1, the predictions are probabilities.
pub fn binary_cross_entropy(target: &[f64], predictions: &[f64]) -> f64 {
    assert_eq!(target.len(), predictions.len());
    let mut total = 0.;
    for (&y, &p) in target.iter().zip(predictions.iter()) {
        let p = p.max(BCE_EPS).min(1. - BCE_EPS);
        total += y * p.ln() + (1. - y) * (1. - p).ln();
    }
    -total / target.len() as f64
}
