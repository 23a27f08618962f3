// Train a classifier on a CSV file, then review it on a held-out test set.
//
// Usage: cargo run --example example_csv -- dataset.csv "Common toad" SR OR RR BR
//
// The CSV must have a header line and be separated with `;`. The target column is converted to
// booleans (1 is true) before the training.

extern crate rdtree;

use rdtree::{
    bools_to_f64, convert_bool, read_csv, train_test_split, ConfusionMatrix, DecisionTreeConfig,
    DecisionTreeModel, DEFAULT_TEST_FRACTION,
};
use std::env;
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        return Err("usage: example_csv <path> <target column> [feature columns...]".into());
    }
    let feature_columns: Vec<&str> = args[2..].iter().map(|s| s.as_str()).collect();
    let feature_columns = if feature_columns.is_empty() {
        None
    } else {
        Some(&feature_columns[..])
    };

    let mut data = read_csv(File::open(&args[0])?, b';', &args[1], feature_columns)?;
    data.target = bools_to_f64(&convert_bool(&data.target, 1.));

    let (train_idx, test_idx) = train_test_split(data.n_rows(), DEFAULT_TEST_FRACTION, Some(1))?;
    let (train, test) = (data.select(&train_idx), data.select(&test_idx));
    println!("{} rows to train, {} to test", train.n_rows(), test.n_rows());

    let mut model = DecisionTreeModel::new(&DecisionTreeConfig::classifier(0.8))?;
    let tree = model.build(&train.features, &train.target)?;
    println!("{} nodes, depth {}\n", tree.n_nodes(), tree.depth());

    let predictions = model.predict(&test.features)?;
    let matrix = ConfusionMatrix::from_predictions(&convert_bool(&test.target, 1.), &predictions)?;
    println!("{}", matrix);

    Ok(())
}
