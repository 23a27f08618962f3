// Example of a classification with a single decision tree.
// The target is 0 or 1, a leaf predicts true when the mean of its target is above the threshold.

extern crate rand;
extern crate rdtree;

use rand::prelude::{Rng, SeedableRng, StdRng};
use rdtree::{
    convert_bool, train_test_split, ConfusionMatrix, Dataset, DecisionTreeConfig,
    DecisionTreeModel, FeatureTable,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let n_rows = 400;
    let a: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let b: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(-1.0..1.0)).collect();
    // Positive in a disk, with 5% of flipped labels
    let target: Vec<f64> = a
        .iter()
        .zip(b.iter())
        .map(|(&a, &b)| {
            let inside = a * a + b * b < 0.5;
            let flipped = rng.gen_bool(0.05);
            if inside != flipped {
                1.
            } else {
                0.
            }
        })
        .collect();
    let data = Dataset::new(FeatureTable::from_columns(vec!["a", "b"], vec![a, b])?, target)?;

    let (train_idx, test_idx) = train_test_split(data.n_rows(), 0.25, Some(3))?;
    let (train, test) = (data.select(&train_idx), data.select(&test_idx));

    for &threshold in &[0.3, 0.5, 0.7] {
        let config = DecisionTreeConfig::classifier(threshold).max_depth(6);
        let mut model = DecisionTreeModel::new(&config)?;
        model.build(&train.features, &train.target)?;

        let predictions = model.predict(&test.features)?;
        let matrix = ConfusionMatrix::from_predictions(&convert_bool(&test.target, 1.), &predictions)?;
        println!("\nthreshold={}\n{}", threshold, matrix);
    }

    Ok(())
}
