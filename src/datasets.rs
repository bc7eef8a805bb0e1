//! Synthetic datasets for experiments and tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::common_types::{FeatureMatrix, Scalar};
use crate::error::{LogisticError, Result};

/// Isotropic Gaussian blobs, one per center.
///
/// Sample `i` belongs to class `i % centers.len()` and is drawn from a normal
/// distribution with standard deviation `cluster_std` around that class's center.
/// The same `seed` always produces the same dataset.
///
/// # Errors
/// - [`LogisticError::InvalidConfig`] if `centers` is empty or `cluster_std` is not
///   a finite non-negative number.
/// - [`LogisticError::DimensionMismatch`] if the centers differ in dimension.
pub fn make_blobs<F: Scalar>(
    n_samples: usize,
    centers: &[Vec<f64>],
    cluster_std: f64,
    seed: u64,
) -> Result<(FeatureMatrix<F>, Vec<usize>)> {
    let n_features = centers.first().map(Vec::len).ok_or(LogisticError::InvalidConfig {
        name: "centers",
        value: "[]".to_string(),
    })?;
    if let Some(center) = centers.iter().find(|c| c.len() != n_features) {
        return Err(LogisticError::DimensionMismatch {
            expected: n_features,
            got: center.len(),
        });
    }
    let invalid_std = || LogisticError::InvalidConfig {
        name: "cluster_std",
        value: cluster_std.to_string(),
    };
    if !cluster_std.is_finite() {
        return Err(invalid_std());
    }
    let noise = Normal::new(0.0, cluster_std).map_err(|_| invalid_std())?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n_samples * n_features);
    let mut labels = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        let class = i % centers.len();
        data.extend(
            centers[class]
                .iter()
                .map(|&c| F::lit(c + noise.sample(&mut rng))),
        );
        labels.push(class);
    }

    Ok((FeatureMatrix::from_flat(data, n_samples, n_features)?, labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_blobs_shape_and_labels() {
        let centers = vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![-5.0, 5.0]];
        let (x, y) = make_blobs::<f64>(30, &centers, 0.5, 1).unwrap();
        assert_eq!(x.n_samples(), 30);
        assert_eq!(x.n_features(), 2);
        assert_eq!(y.iter().filter(|&&l| l == 2).count(), 10);
        assert_eq!(&y[..4], &[0, 1, 2, 0]);
    }

    #[test]
    fn test_make_blobs_is_deterministic() {
        let centers = vec![vec![1.0], vec![-1.0]];
        let a = make_blobs::<f32>(10, &centers, 1.0, 99).unwrap();
        let b = make_blobs::<f32>(10, &centers, 1.0, 99).unwrap();
        let c = make_blobs::<f32>(10, &centers, 1.0, 100).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn test_zero_std_puts_samples_on_centers() {
        let centers = vec![vec![2.0, -3.0]];
        let (x, _) = make_blobs::<f64>(3, &centers, 0.0, 0).unwrap();
        assert!(x.rows().all(|row| row == [2.0, -3.0]));
    }

    #[test]
    fn test_make_blobs_errors() {
        assert!(make_blobs::<f64>(10, &[], 1.0, 0).is_err());
        assert!(make_blobs::<f64>(10, &[vec![0.0], vec![1.0, 2.0]], 1.0, 0).is_err());
        assert!(make_blobs::<f64>(10, &[vec![0.0]], -1.0, 0).is_err());
        assert!(make_blobs::<f64>(10, &[vec![0.0]], f64::INFINITY, 0).is_err());
    }
}
