//! Core data types for representing target variables.

use ndarray::{ArrayView1, ArrayView2, Axis};

/// Enum to represent the structure of the regression targets.
///
/// A univariate target is treated as a single output column (k = 1), so both
/// variants go through the same stacking path.
#[derive(Debug, Clone, Copy)]
pub enum TargetData<'a> {
    /// A 1-dimensional view of a single-output target.
    Univariate(ArrayView1<'a, f64>),
    /// A 2-dimensional view of a multi-output target (n_samples x k_outputs).
    Multivariate(ArrayView2<'a, f64>),
}

impl<'a> TargetData<'a> {
    /// Number of samples (rows).
    pub fn n_samples(&self) -> usize {
        match self {
            TargetData::Univariate(y) => y.len(),
            TargetData::Multivariate(y) => y.nrows(),
        }
    }

    /// Number of outputs (columns).
    pub fn n_outputs(&self) -> usize {
        match self {
            TargetData::Univariate(_) => 1,
            TargetData::Multivariate(y) => y.ncols(),
        }
    }

    /// View the targets as an n_samples x k_outputs matrix.
    pub fn as_matrix(&self) -> ArrayView2<'a, f64> {
        match *self {
            TargetData::Univariate(y) => y.insert_axis(Axis(1)),
            TargetData::Multivariate(y) => y,
        }
    }
}

impl<'a> From<ArrayView1<'a, f64>> for TargetData<'a> {
    fn from(y: ArrayView1<'a, f64>) -> Self {
        TargetData::Univariate(y)
    }
}

impl<'a> From<ArrayView2<'a, f64>> for TargetData<'a> {
    fn from(y: ArrayView2<'a, f64>) -> Self {
        TargetData::Multivariate(y)
    }
}
