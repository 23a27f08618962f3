// Example of a regression with a single decision tree, on a noisy step function.

extern crate rand;
extern crate rdtree;

use rand::prelude::{Rng, SeedableRng, StdRng};
use rdtree::{
    rmse, train_test_split, Dataset, DecisionTreeConfig, DecisionTreeModel, FeatureTable,
    DEFAULT_TEST_FRACTION,
};
use std::time::Instant;

fn make_dataset(n_rows: usize, rng: &mut impl Rng) -> Result<Dataset, Box<dyn std::error::Error>> {
    let x: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(0.0..10.0)).collect();
    let noise: Vec<f64> = (0..n_rows).map(|_| rng.gen_range(0.0..1.0)).collect();
    let target: Vec<f64> = x
        .iter()
        .zip(noise.iter())
        .map(|(&x, &e)| {
            let step = if x < 3. {
                1.
            } else if x < 7. {
                5.
            } else {
                2.
            };
            step + e - 0.5
        })
        .collect();
    let features = FeatureTable::from_columns(vec!["x", "noise"], vec![x, noise])?;
    Ok(Dataset::new(features, target)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The data is random, we set the seed so the example is reproducible
    let mut rng = StdRng::seed_from_u64(42);
    let data = make_dataset(500, &mut rng)?;
    let (train_idx, test_idx) = train_test_split(data.n_rows(), DEFAULT_TEST_FRACTION, Some(1))?;
    let (train, test) = (data.select(&train_idx), data.select(&test_idx));

    for max_depth in 0..6 {
        let config = DecisionTreeConfig::regression().max_depth(max_depth);
        let mut model = DecisionTreeModel::new(&config)?;

        let start_time = Instant::now();
        let tree = model.build(&train.features, &train.target)?;
        println!(
            "\nmax_depth={} built in {}ms: {} leaves",
            max_depth,
            start_time.elapsed().as_millis(),
            tree.n_leaves()
        );

        let yhat_train: Vec<f64> = model
            .predict(&train.features)?
            .iter()
            .map(|p| p.as_f64())
            .collect();
        println!("RMSE train {:.8}", rmse(&train.target, &yhat_train));

        let yhat_test: Vec<f64> = model
            .predict(&test.features)?
            .iter()
            .map(|p| p.as_f64())
            .collect();
        println!("RMSE test {:.8}", rmse(&test.target, &yhat_test));
    }

    let mut model = DecisionTreeModel::new(&DecisionTreeConfig::regression().max_depth(2))?;
    println!("\n{}", model.build(&train.features, &train.target)?);

    Ok(())
}
