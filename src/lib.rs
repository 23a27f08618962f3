//! Binary decision trees on named numerical features, for a regression or a thresholded
//! classification.
//!
//! ```
//! use rdtree::{DecisionTreeConfig, DecisionTreeModel, FeatureTable, Prediction};
//!
//! let features =
//!     FeatureTable::from_columns(vec!["x"], vec![vec![1., 2., 3., 4., 5., 6.]]).unwrap();
//! let target = vec![1., 1., 1., 10., 10., 10.];
//!
//! let config = DecisionTreeConfig::regression().min_samples(1).max_depth(5);
//! let mut model = DecisionTreeModel::new(&config).unwrap();
//! model.build(&features, &target).unwrap();
//!
//! let row: &[(&str, f64)] = &[("x", 5.)];
//! assert_eq!(model.predict_one(row).unwrap(), Prediction::Value(10.));
//! ```

extern crate csv;
extern crate log;
extern crate ordered_float;
extern crate rand;
extern crate rayon;
#[macro_use]
extern crate serde_derive;

mod cost;
mod data;
mod error;
mod math;
mod matrix;
mod metrics;
mod model;
mod split;
mod tree;

pub use crate::cost::*;
pub use crate::data::*;
pub use crate::error::*;
pub use crate::math::*;
pub use crate::matrix::*;
pub use crate::metrics::*;
pub use crate::model::*;
pub use crate::split::*;
pub use crate::tree::*;

pub static DEFAULT_MIN_SAMPLES: usize = 5;
pub static DEFAULT_MAX_DEPTH: usize = 10;
pub static DEFAULT_SPLIT_FUNCTION: &str = "best_split_numerical";
pub static DEFAULT_COST_FUNCTION: &str = "mean_squared_error";
pub static DEFAULT_TEST_FRACTION: f64 = 0.2;
