use crate::{Prediction, TreeError, TreeResult};
use std::fmt;

/// Counts of a binary classification, compared to the ground truth.
///
/// Layout of [ConfusionMatrix::as_array]:
///
/// ```text
///             predicted 1  predicted 0
/// actual 1    TP           FN
/// actual 0    FP           TN
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_negative: usize,
    pub false_positive: usize,
    pub true_negative: usize,
}

impl ConfusionMatrix {
    pub fn new(target: &[bool], predicted: &[bool]) -> TreeResult<ConfusionMatrix> {
        if target.len() != predicted.len() {
            return Err(TreeError::InvalidData(format!(
                "got {} targets for {} predictions",
                target.len(),
                predicted.len()
            )));
        }
        if target.is_empty() {
            return Err(TreeError::InvalidData(
                "no prediction to evaluate".to_string(),
            ));
        }
        let mut matrix = ConfusionMatrix {
            true_positive: 0,
            false_negative: 0,
            false_positive: 0,
            true_negative: 0,
        };
        for (&actual, &predicted) in target.iter().zip(predicted) {
            match (actual, predicted) {
                (true, true) => matrix.true_positive += 1,
                (true, false) => matrix.false_negative += 1,
                (false, true) => matrix.false_positive += 1,
                (false, false) => matrix.true_negative += 1,
            }
        }
        Ok(matrix)
    }

    /// Predictions of a model are coerced to booleans, see [Prediction::as_bool].
    pub fn from_predictions(
        target: &[bool],
        predictions: &[Prediction],
    ) -> TreeResult<ConfusionMatrix> {
        let predicted: Vec<bool> = predictions.iter().map(|p| p.as_bool()).collect();
        Self::new(target, &predicted)
    }

    pub fn as_array(&self) -> [[usize; 2]; 2] {
        [
            [self.true_positive, self.false_negative],
            [self.false_positive, self.true_negative],
        ]
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_negative + self.false_positive + self.true_negative
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        (self.true_positive + self.true_negative) as f64 / self.total() as f64
    }

    /// TP / (TP + FP), or 0 without positive prediction
    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive,
        )
    }

    /// TP / (TP + FN), or 0 without positive target
    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_negative,
        )
    }

    pub fn f1_score(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0. {
            2. * p * r / (p + r)
        } else {
            0.
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den > 0 {
        num as f64 / den as f64
    } else {
        0.
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "          predicted 1  predicted 0")?;
        writeln!(
            f,
            "actual 1  {:>11}  {:>11}",
            self.true_positive, self.false_negative
        )?;
        writeln!(
            f,
            "actual 0  {:>11}  {:>11}",
            self.false_positive, self.true_negative
        )?;
        writeln!(f, "accuracy  {:.4}", self.accuracy())?;
        writeln!(f, "precision {:.4}", self.precision())?;
        writeln!(f, "recall    {:.4}", self.recall())?;
        write!(f, "f1 score  {:.4}", self.f1_score())
    }
}
