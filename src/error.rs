use thiserror::Error;

/// Errors raised while configuring a model, building it, predicting with it,
/// or loading the data it is trained on.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown {kind} function `{name}`")]
    UnknownFunction { kind: &'static str, name: String },

    #[error("invalid model type `{0}`, expected `regression` or `classifier`")]
    InvalidModelType(String),

    #[error("a classifier requires a threshold for a true assignment")]
    MissingThreshold,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("the tree must be built before predicting")]
    ModelNotBuilt,

    #[error("feature `{0}` is missing from the row")]
    MissingFeature(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    ParseFloat(#[from] std::num::ParseFloatError),
}

pub type TreeResult<T> = Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TreeError::UnknownFunction {
            kind: "cost",
            name: "gini".to_string(),
        };
        assert_eq!(err.to_string(), "unknown cost function `gini`");
        assert_eq!(
            TreeError::MissingFeature("SR".to_string()).to_string(),
            "feature `SR` is missing from the row"
        );
    }

    #[test]
    fn test_from_parse_float() {
        let err: TreeError = "abc".parse::<f64>().unwrap_err().into();
        match err {
            TreeError::ParseFloat(_) => {}
            other => panic!("unexpected error {:?}", other),
        }
    }
}
