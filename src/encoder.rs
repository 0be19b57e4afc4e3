//! Multi-output to single-output stacking.
//!
//! A problem with `k` outputs is rewritten as one with a single output by
//! repeating the feature matrix `k` times and tagging each copy with a one-hot
//! indicator of the output it stands for:
//!
//! ```text
//! X  (n x f), Y (n x k)
//!
//!        [ X | e_0 ]            [ Y[:, 0] ]
//! X'  =  [ X | e_1 ]     y'  =  [ Y[:, 1] ]
//!        [ ...     ]            [ ...     ]
//!        [ X | e_k-1 ]          [ Y[:, k-1] ]
//! ```
//!
//! `X'` is `(n*k) x (f+k)` and `y'[j*n + i] == Y[i][j]`. Predictions made on
//! `X'` come back in the same order and `inverse_transform` folds them back
//! into an `n x k` matrix.

use crate::error::{MultiStackError, Result};
use crate::matrix::{CsrMatrix, DenseMatrix, FeatureMatrix, Matrix};
use crate::types::TargetData;
use crate::utils::{flatten_fortran, unflatten_fortran};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use tracing::debug;

/// Output of `forward_transform`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedData {
    /// `(n_samples * n_outputs) x (n_features + n_outputs)`.
    pub features: FeatureMatrix,
    /// Fortran-order flattening of the targets, length `n_samples * n_outputs`.
    pub targets: Array1<f64>,
    pub n_samples: usize,
    pub n_outputs: usize,
}

/// Stack a feature matrix and a multi-output target into single-output form.
///
/// # Errors
///
/// `ShapeMismatch` if `x` and `y` disagree on the number of rows, or if `y`
/// has no output columns.
///
/// # Example
///
/// ```
/// use multistack::encoder::forward_transform;
/// use multistack::matrix::FeatureMatrix;
/// use ndarray::array;
///
/// let x = FeatureMatrix::from(array![[1.0], [2.0]]);
/// let y = array![[10.0, 100.0], [20.0, 200.0]];
///
/// let stacked = forward_transform(&x, y.view()).unwrap();
/// assert_eq!(
///     stacked.features.to_dense(),
///     array![[1.0, 1.0, 0.0], [2.0, 1.0, 0.0], [1.0, 0.0, 1.0], [2.0, 0.0, 1.0]]
/// );
/// assert_eq!(stacked.targets, array![10.0, 20.0, 100.0, 200.0]);
/// ```
pub fn forward_transform<'a>(
    x: &FeatureMatrix,
    y: impl Into<TargetData<'a>>,
) -> Result<StackedData> {
    let y = y.into();
    let n_samples = x.nrows();

    if y.n_samples() != n_samples {
        return Err(MultiStackError::shape(
            format!("{} target rows", n_samples),
            format!("{} target rows", y.n_samples()),
        ));
    }

    let n_outputs = y.n_outputs();
    let features = stack_features(x, n_outputs)?;
    let targets = flatten_fortran(&y.as_matrix());

    debug!(
        n_samples,
        n_features = x.ncols(),
        n_outputs,
        sparse = x.is_sparse(),
        "stacked multi-output problem"
    );

    Ok(StackedData {
        features,
        targets,
        n_samples,
        n_outputs,
    })
}

/// Build the stacked feature matrix for `n_outputs` outputs.
///
/// This is the feature half of `forward_transform`, used when predicting
/// where there are no targets. Sparse input stays sparse.
pub fn stack_features(x: &FeatureMatrix, n_outputs: usize) -> Result<FeatureMatrix> {
    match x {
        FeatureMatrix::Dense(m) => Ok(FeatureMatrix::Dense(stack_matrix::<DenseMatrix>(
            m, n_outputs,
        )?)),
        FeatureMatrix::Sparse(m) => Ok(FeatureMatrix::Sparse(stack_matrix::<CsrMatrix>(
            m, n_outputs,
        )?)),
    }
}

/// Representation-generic stacking: `[X repeated k times | block-diagonal ones]`.
pub fn stack_matrix<M: Matrix>(x: &M, n_outputs: usize) -> Result<M> {
    if n_outputs == 0 {
        return Err(MultiStackError::shape(
            "at least one output",
            "0 outputs",
        ));
    }

    let repeated = x.repeat_rows(n_outputs)?;
    let indicators = M::block_diagonal_ones(x.nrows(), n_outputs);
    repeated.horizontal_concat(&indicators)
}

/// Convenience for dense `ndarray` inputs; returns a dense `X'`.
pub fn forward_transform_dense(
    x: &ArrayView2<f64>,
    y: &ArrayView2<f64>,
) -> Result<(Array2<f64>, Array1<f64>)> {
    let stacked = forward_transform(&FeatureMatrix::from(x.to_owned()), *y)?;
    match stacked.features {
        FeatureMatrix::Dense(m) => Ok((m.into_array(), stacked.targets)),
        FeatureMatrix::Sparse(m) => Ok((m.to_dense(), stacked.targets)),
    }
}

/// Fold flat single-output predictions back into an `n x n_outputs` matrix.
///
/// `y_pred[j*n + i]` becomes `Y_pred[i][j]` with `n = y_pred.len() / n_outputs`.
///
/// # Errors
///
/// `ShapeMismatch` if `n_outputs` is zero or does not divide `y_pred.len()`.
pub fn inverse_transform(y_pred: &ArrayView1<f64>, n_outputs: usize) -> Result<Array2<f64>> {
    unflatten_fortran(y_pred, n_outputs)
}
