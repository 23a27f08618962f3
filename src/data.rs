use crate::{ColumnMajorMatrix, StridedVecView, TreeError, TreeResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;

/// Access to the value of a named feature for a single sample.
///
/// Anything that can answer "what is the value of feature X" can be sent to a tree for prediction.
pub trait FeatureRow {
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureRow for HashMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).cloned()
    }
}

impl FeatureRow for BTreeMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).cloned()
    }
}

impl<'a> FeatureRow for [(&'a str, f64)] {
    fn feature(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|&(_, v)| v)
    }
}

impl<'a, R: FeatureRow + ?Sized> FeatureRow for &'a R {
    fn feature(&self, name: &str) -> Option<f64> {
        (**self).feature(name)
    }
}

/// Numeric features stored by named columns. All the columns have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    names: Vec<String>,
    values: ColumnMajorMatrix<f64>,
}

impl FeatureTable {
    pub fn from_columns<S: Into<String>>(
        names: Vec<S>,
        columns: Vec<Vec<f64>>,
    ) -> TreeResult<FeatureTable> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != columns.len() {
            return Err(TreeError::InvalidData(format!(
                "got {} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(TreeError::InvalidData(format!(
                    "duplicated column `{}`",
                    name
                )));
            }
        }
        if let Some(first) = columns.first() {
            for (name, column) in names.iter().zip(columns.iter()) {
                if column.len() != first.len() {
                    return Err(TreeError::InvalidData(format!(
                        "column `{}` has {} rows, expected {}",
                        name,
                        column.len(),
                        first.len()
                    )));
                }
                if column.iter().any(|v| v.is_nan()) {
                    return Err(TreeError::InvalidData(format!(
                        "column `{}` contains NaN",
                        name
                    )));
                }
            }
        }
        Ok(FeatureTable {
            names,
            values: ColumnMajorMatrix::from_columns(columns),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.values.n_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.n_cols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column_id(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_id(name).map(|id| self.values.column(id))
    }

    pub fn column_by_id(&self, feature_id: usize) -> &[f64] {
        self.values.column(feature_id)
    }

    pub fn row(&self, row: usize) -> TableRow {
        TableRow {
            names: &self.names,
            values: self.values.row(row),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// Keep only the given rows, in the given order.
    pub fn select(&self, rows: &[usize]) -> FeatureTable {
        FeatureTable {
            names: self.names.clone(),
            values: self.values.select_rows(rows),
        }
    }
}

/// One row of a [FeatureTable].
pub struct TableRow<'a> {
    names: &'a [String],
    values: StridedVecView<'a, f64>,
}

impl<'a> FeatureRow for TableRow<'a> {
    fn feature(&self, name: &str) -> Option<f64> {
        let id = self.names.iter().position(|n| n == name)?;
        Some(self.values[id])
    }
}

/// Store the raw data: features and the target to learn.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Predictor for the learning
    pub features: FeatureTable,
    /// Target, used for the learning
    pub target: Vec<f64>,
}

impl Dataset {
    pub fn new(features: FeatureTable, target: Vec<f64>) -> TreeResult<Dataset> {
        check_lengths(&features, &target)?;
        Ok(Dataset { features, target })
    }

    pub fn n_rows(&self) -> usize {
        self.target.len()
    }

    pub fn select(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(rows),
            target: rows.iter().map(|&i| self.target[i]).collect(),
        }
    }
}

pub(crate) fn check_lengths(features: &FeatureTable, target: &[f64]) -> TreeResult<()> {
    if features.n_cols() > 0 && features.n_rows() != target.len() {
        return Err(TreeError::InvalidData(format!(
            "features have {} rows but the target has {}",
            features.n_rows(),
            target.len()
        )));
    }
    if target.iter().any(|v| v.is_nan()) {
        return Err(TreeError::InvalidData("target contains NaN".to_string()));
    }
    Ok(())
}

/// Load a CSV with a header line.
///
/// * `target_column` - column to learn.
/// * `feature_columns` - columns to use as features. When `None`, every other column is used.
pub fn read_csv<R: Read>(
    reader: R,
    delimiter: u8,
    target_column: &str,
    feature_columns: Option<&[&str]>,
) -> TreeResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TreeError::InvalidData(format!("no column `{}` in the CSV", name)))
    };
    let target_id = find(target_column)?;
    let feature_ids: Vec<usize> = match feature_columns {
        Some(names) => names.iter().map(|&n| find(n)).collect::<TreeResult<_>>()?,
        None => (0..headers.len()).filter(|&i| i != target_id).collect(),
    };

    let mut target = Vec::new();
    let mut columns: Vec<Vec<f64>> = feature_ids.iter().map(|_| Vec::new()).collect();
    for (n_line, record) in reader.records().enumerate() {
        let record = record?;
        let parse = |col: usize| -> TreeResult<f64> {
            let raw = record.get(col).ok_or_else(|| {
                TreeError::InvalidData(format!("line {} is too short", n_line + 2))
            })?;
            let val: f64 = raw.parse()?;
            if val.is_nan() {
                return Err(TreeError::InvalidData(format!(
                    "NaN in column `{}` line {}",
                    headers[col],
                    n_line + 2
                )));
            }
            Ok(val)
        };
        target.push(parse(target_id)?);
        for (column, &col) in columns.iter_mut().zip(feature_ids.iter()) {
            column.push(parse(col)?);
        }
    }

    let names = feature_ids.iter().map(|&i| headers[i].clone()).collect();
    let features = FeatureTable::from_columns(names, columns)?;
    Dataset::new(features, target)
}

/// Flag as true the values equal to `true_flag`.
pub fn convert_bool(values: &[f64], true_flag: f64) -> Vec<bool> {
    values.iter().map(|&v| v == true_flag).collect()
}

pub fn bools_to_f64(values: &[bool]) -> Vec<f64> {
    values.iter().map(|&v| if v { 1. } else { 0. }).collect()
}

/// Split the row indices `0..n_rows` into a train and a test set, returned in that order.
///
/// The first `floor(n_rows * test_fraction)` rows of a random permutation are the test set.
pub fn train_test_split(
    n_rows: usize,
    test_fraction: f64,
    seed: Option<u64>,
) -> TreeResult<(Vec<usize>, Vec<usize>)> {
    if !(0. ..=1.).contains(&test_fraction) {
        return Err(TreeError::InvalidParameter(format!(
            "test fraction must be between 0 and 1, got {}",
            test_fraction
        )));
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut permutation: Vec<usize> = (0..n_rows).collect();
    permutation.shuffle(&mut rng);

    let test_count = (n_rows as f64 * test_fraction) as usize;
    let train = permutation.split_off(test_count);
    Ok((train, permutation))
}
