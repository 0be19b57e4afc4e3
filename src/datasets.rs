//! Synthetic regression data for demos and tests.
//!
//! Every function takes the random generator explicitly, so results are
//! reproducible from a seed:
//!
//! ```
//! use multistack::datasets::make_regression;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let data = make_regression(100, 5, 3, 0.1, &mut rng).unwrap();
//! assert_eq!(data.targets.dim(), (100, 3));
//! ```

use crate::error::{MultiStackError, Result};
use ndarray::{Array2, Axis};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Normal, StandardNormal, Uniform};

/// A generated multi-output regression problem.
#[derive(Debug, Clone)]
pub struct RegressionData {
    /// n_samples x n_features, standard normal.
    pub features: Array2<f64>,
    /// n_samples x n_outputs.
    pub targets: Array2<f64>,
    /// n_features x n_outputs ground-truth coefficients.
    pub coefficients: Array2<f64>,
}

/// A train/test partition of features and targets.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array2<f64>,
    pub y_test: Array2<f64>,
}

/// Generate a linear multi-output regression problem.
///
/// Targets are `features.dot(coefficients)` plus Gaussian noise with standard
/// deviation `noise`. Coefficients are drawn uniformly from `[0, 100)`.
pub fn make_regression<R: Rng + ?Sized>(
    n_samples: usize,
    n_features: usize,
    n_outputs: usize,
    noise: f64,
    rng: &mut R,
) -> Result<RegressionData> {
    if n_samples == 0 || n_features == 0 || n_outputs == 0 {
        return Err(MultiStackError::InvalidParameter(format!(
            "dimensions must be positive, got n_samples={}, n_features={}, n_outputs={}",
            n_samples, n_features, n_outputs
        )));
    }
    if !noise.is_finite() || noise < 0.0 {
        return Err(MultiStackError::InvalidParameter(format!(
            "noise must be a non-negative finite number, got {}",
            noise
        )));
    }

    let features: Array2<f64> = Array2::from_shape_simple_fn((n_samples, n_features), || {
        rng.sample(StandardNormal)
    });

    let coef_dist = Uniform::new(0.0, 100.0)
        .map_err(|e| MultiStackError::InvalidParameter(e.to_string()))?;
    let coefficients =
        Array2::from_shape_simple_fn((n_features, n_outputs), || rng.sample(&coef_dist));

    let mut targets = features.dot(&coefficients);
    if noise > 0.0 {
        let noise_dist =
            Normal::new(0.0, noise).map_err(|e| MultiStackError::InvalidParameter(e.to_string()))?;
        targets.mapv_inplace(|v| v + rng.sample(&noise_dist));
    }

    Ok(RegressionData {
        features,
        targets,
        coefficients,
    })
}

/// Shuffle rows and split them into train and test sets.
///
/// The test set gets `round(n_samples * test_fraction)` rows; both sides must
/// end up non-empty.
pub fn train_test_split<R: Rng + ?Sized>(
    features: &Array2<f64>,
    targets: &Array2<f64>,
    test_fraction: f64,
    rng: &mut R,
) -> Result<TrainTestSplit> {
    let n_samples = features.nrows();
    if targets.nrows() != n_samples {
        return Err(MultiStackError::shape(
            format!("{} target rows", n_samples),
            format!("{} target rows", targets.nrows()),
        ));
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(MultiStackError::InvalidParameter(format!(
            "test_fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }

    let n_test = (n_samples as f64 * test_fraction).round() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(MultiStackError::InvalidParameter(format!(
            "test_fraction {} leaves an empty side with {} samples",
            test_fraction, n_samples
        )));
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    indices.shuffle(rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok(TrainTestSplit {
        x_train: features.select(Axis(0), train_idx),
        x_test: features.select(Axis(0), test_idx),
        y_train: targets.select(Axis(0), train_idx),
        y_test: targets.select(Axis(0), test_idx),
    })
}
