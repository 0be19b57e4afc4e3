//! Integration tests for multistack.

use multistack::datasets::{make_regression, train_test_split};
use multistack::matrix::MatrixPayload;
use multistack::prelude::*;
use ndarray::{Array1, Array2, array, s};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn test_reference_example() {
    let x = FeatureMatrix::from(array![[1.0], [2.0]]);
    let y = array![[10.0, 100.0], [20.0, 200.0]];

    let stacked = forward_transform(&x, y.view()).unwrap();

    assert_eq!(
        stacked.features.to_dense(),
        array![
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
            [2.0, 0.0, 1.0]
        ]
    );
    assert_eq!(stacked.targets, array![10.0, 20.0, 100.0, 200.0]);

    let recovered = inverse_transform(&stacked.targets.view(), 2).unwrap();
    assert_eq!(recovered, y);
}

#[test]
fn test_row_count_mismatch_is_shape_error() {
    let x = FeatureMatrix::from(Array2::<f64>::zeros((3, 1)));
    let y = Array2::<f64>::zeros((2, 2));

    let err = forward_transform(&x, y.view()).unwrap_err();
    assert!(matches!(err, MultiStackError::ShapeMismatch { .. }));
}

#[test]
fn test_indivisible_prediction_length_is_shape_error() {
    let y_pred = array![1.0, 2.0, 3.0, 4.0, 5.0];

    let err = inverse_transform(&y_pred.view(), 2).unwrap_err();
    assert!(matches!(err, MultiStackError::ShapeMismatch { .. }));
}

#[test]
fn test_unknown_layout_is_unsupported() {
    let json = r#"{"format": "bsr", "shape": [1, 1], "data": [1.0]}"#;
    let payload = MatrixPayload::from_json_str(json).unwrap();

    let err = FeatureMatrix::try_from(payload).unwrap_err();
    assert!(matches!(err, MultiStackError::UnsupportedRepresentation(_)));
}

// =============================================================================
// Properties over seeded random shapes
// =============================================================================

fn random_problem(rng: &mut ChaCha8Rng) -> (Array2<f64>, Array2<f64>) {
    let n = rng.random_range(1..8);
    let f = rng.random_range(1..5);
    let k = rng.random_range(1..5);
    // Roughly half the features are exact zeros so the sparse path has gaps
    let x = Array2::from_shape_simple_fn((n, f), || {
        if rng.random_bool(0.5) {
            0.0
        } else {
            rng.random_range(-10.0..10.0)
        }
    });
    let y = Array2::from_shape_simple_fn((n, k), || rng.random_range(-100.0..100.0));
    (x, y)
}

#[test]
fn test_round_trip_is_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..50 {
        let (x, y) = random_problem(&mut rng);
        let stacked = forward_transform(&FeatureMatrix::from(x), y.view()).unwrap();
        let recovered = inverse_transform(&stacked.targets.view(), y.ncols()).unwrap();
        assert_eq!(recovered, y);
    }
}

#[test]
fn test_shape_invariant() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..50 {
        let (x, y) = random_problem(&mut rng);
        let (n, f) = x.dim();
        let k = y.ncols();
        let stacked = forward_transform(&FeatureMatrix::from(x), y.view()).unwrap();

        assert_eq!(stacked.features.shape(), (n * k, f + k));
        assert_eq!(stacked.targets.len(), n * k);
    }
}

#[test]
fn test_rows_are_features_plus_one_hot() {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    for _ in 0..30 {
        let (x, y) = random_problem(&mut rng);
        let (n, f) = x.dim();
        let k = y.ncols();
        let stacked = forward_transform(&FeatureMatrix::from(x.clone()), y.view()).unwrap();
        let dense = stacked.features.to_dense();

        for j in 0..k {
            for i in 0..n {
                let row = dense.row(j * n + i);
                assert_eq!(row.slice(s![..f]), x.row(i));
                for c in 0..k {
                    assert_eq!(row[f + c], if c == j { 1.0 } else { 0.0 });
                }
                assert_eq!(stacked.targets[j * n + i], y[[i, j]]);
            }
        }
    }
}

#[test]
fn test_sparse_and_dense_agree() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..30 {
        let (x, y) = random_problem(&mut rng);
        let dense = forward_transform(&FeatureMatrix::from(x.clone()), y.view()).unwrap();
        let sparse_x = FeatureMatrix::from(CsrMatrix::from_dense(&x.view()));
        let sparse = forward_transform(&sparse_x, y.view()).unwrap();

        assert!(sparse.features.is_sparse());
        assert_eq!(sparse.features.to_dense(), dense.features.to_dense());
        assert_eq!(sparse.targets, dense.targets);
    }
}

#[test]
fn test_csc_payload_stacks_like_dense() {
    // [[1, 0],
    //  [0, 2],
    //  [3, 0]]
    let json = r#"{
        "format": "csc",
        "shape": [3, 2],
        "data": [1.0, 3.0, 2.0],
        "indices": [0, 2, 1],
        "indptr": [0, 2, 3]
    }"#;
    let x = FeatureMatrix::try_from(MatrixPayload::from_json_str(json).unwrap()).unwrap();
    let dense_x = FeatureMatrix::from(array![[1.0, 0.0], [0.0, 2.0], [3.0, 0.0]]);
    let y = array![1.0, 2.0, 3.0];

    let sparse = stack_features(&x, 2).unwrap();
    let dense = stack_features(&dense_x, 2).unwrap();
    assert!(sparse.is_sparse());
    assert_eq!(sparse.to_dense(), dense.to_dense());

    let stacked = forward_transform(&x, y.view()).unwrap();
    assert_eq!(stacked.features.shape(), (3, 3));
}

// =============================================================================
// End-to-end through a training service
// =============================================================================

/// Predicts the training mean of whichever output a stacked row is tagged with.
struct OutputMeans {
    means: Array1<f64>,
}

impl FittedPredictor for OutputMeans {
    fn predict(&self, features: &FeatureMatrix) -> Result<Array1<f64>> {
        let dense = features.to_dense();
        let k = self.means.len();
        let f = dense.ncols() - k;
        Ok(dense
            .rows()
            .into_iter()
            .map(|row| {
                let j = (0..k).find(|&c| row[f + c] == 1.0).unwrap_or(0);
                self.means[j]
            })
            .collect())
    }
}

struct MeanService {
    n_outputs: usize,
}

impl TrainingService for MeanService {
    type Predictor = OutputMeans;

    fn name(&self) -> &str {
        "mean"
    }

    fn submit(
        &self,
        config: &SubmitConfig,
        features: &FeatureMatrix,
        targets: &Array1<f64>,
    ) -> Result<OutputMeans> {
        assert_eq!(config.task, Task::Regression);
        assert_eq!(features.nrows(), targets.len());

        let dense = features.to_dense();
        let f = dense.ncols() - self.n_outputs;
        let mut sums = Array1::<f64>::zeros(self.n_outputs);
        let mut counts = Array1::<f64>::zeros(self.n_outputs);
        for (row, &t) in dense.rows().into_iter().zip(targets.iter()) {
            let j = (0..self.n_outputs)
                .find(|&c| row[f + c] == 1.0)
                .ok_or_else(|| MultiStackError::InvalidInput("row without indicator".into()))?;
            sums[j] += t;
            counts[j] += 1.0;
        }
        Ok(OutputMeans {
            means: sums / counts,
        })
    }
}

#[test]
fn test_regressor_end_to_end() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let data = make_regression(60, 4, 3, 0.1, &mut rng).unwrap();
    let split = train_test_split(&data.features, &data.targets, 0.25, &mut rng).unwrap();

    let config = SubmitConfig::default()
        .with_primary_metric(PrimaryMetric::SpearmanCorrelation)
        .with_iterations(4);
    let mut model = MultiOutputRegressor::new(MeanService { n_outputs: 3 }, config);

    let x_train = FeatureMatrix::from(split.x_train.clone());
    model.fit(&x_train, split.y_train.view()).unwrap();
    assert_eq!(model.n_outputs(), Some(3));

    let y_pred = model.predict(&FeatureMatrix::from(split.x_test.clone())).unwrap();
    assert_eq!(y_pred.dim(), split.y_test.dim());

    let means = split.y_train.mean_axis(ndarray::Axis(0)).unwrap();
    for row in y_pred.rows() {
        for j in 0..3 {
            approx::assert_relative_eq!(row[j], means[j], epsilon = 1e-9);
        }
    }
}

#[test]
fn test_regressor_with_sparse_features() {
    let x = array![[0.0, 1.0], [2.0, 0.0], [0.0, 0.0], [4.0, 5.0]];
    let y = array![[1.0, 10.0], [3.0, 30.0], [5.0, 50.0], [7.0, 70.0]];
    let sparse_x = FeatureMatrix::from(CsrMatrix::from_dense(&x.view()));

    let mut model = MultiOutputRegressor::new(MeanService { n_outputs: 2 }, SubmitConfig::default());
    model.fit(&sparse_x, y.view()).unwrap();

    let y_pred = model.predict(&sparse_x).unwrap();
    assert_eq!(y_pred, array![[4.0, 40.0], [4.0, 40.0], [4.0, 40.0], [4.0, 40.0]]);
}

#[test]
fn test_regressor_rejects_invalid_config() {
    let config = SubmitConfig::default().with_n_cross_validations(0);
    let mut model = MultiOutputRegressor::new(MeanService { n_outputs: 1 }, config);
    let x = FeatureMatrix::from(array![[1.0]]);

    let err = model.fit(&x, array![1.0].view()).unwrap_err();
    assert!(matches!(err, MultiStackError::InvalidParameter(_)));
    assert!(!model.is_trained());
}
