pub fn sum(v: &[f64]) -> f64 {
    let mut o = 0.;
    for e in v.iter() {
        o += *e;
    }
    o
}

pub fn mean(v: &[f64]) -> f64 {
    sum(&v) / (v.len() as f64)
}

/// Population variance, ie the mean of the squared deviations to the mean.
pub fn variance(v: &[f64]) -> f64 {
    let m = mean(v);
    let squares: f64 = v.iter().map(|&e| (e - m).powi(2)).sum();
    squares / (v.len() as f64)
}

pub fn rmse(target: &[f64], yhat: &[f64]) -> f64 {
    let rmse: f64 = yhat
        .iter()
        .zip(target.iter())
        .map(|(&a, &b)| (a - b).powi(2))
        .sum();
    (rmse / target.len() as f64).sqrt()
}

pub(crate) fn mean_indices(v: &[f64], indices: &[usize]) -> f64 {
    // A mean over a null set is not possible there, and this catch bugs.
    assert_ne!(indices.len(), 0);
    let mut o = 0.;
    for &i in indices {
        o += v[i];
    }
    o / indices.len() as f64
}

#[cfg(test)]
mod tests {
    use crate::*;

    macro_rules! assert_almost_eq {
        ($a : expr, $b:expr) => {
            let (a, b) = ($a, $b);
            let eps = 1e-5;
            let diff = (a - b).abs();
            if diff > eps {
                panic!("{} != {} at +-{}", a, b, eps)
            }
        };
    }

    #[test]
    fn test_mean_variance() {
        assert_almost_eq!(mean(&[1., 2., 3., 4.]), 2.5);
        assert_almost_eq!(variance(&[1., 2., 3., 4.]), 1.25);
        assert_almost_eq!(variance(&[7.]), 0.);
    }

    #[test]
    fn test_rmse() {
        assert_almost_eq!(rmse(&[1., 2., 3.], &[1., 2., 3.]), 0.);
        assert_almost_eq!(rmse(&[0., 0.], &[3., 4.]), (12.5f64).sqrt());
    }

    #[test]
    fn test_indices() {
        let v = vec![1., 10., 100., 1000.];
        assert_almost_eq!(super::mean_indices(&v, &[1, 3]), 505.);
    }
}
