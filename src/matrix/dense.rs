//! Dense feature matrix backed by `ndarray`.

use super::Matrix;
use crate::error::{MultiStackError, Result};
use ndarray::{Array2, ArrayView2, Axis, concatenate, s};

/// Row-major dense matrix of `f64` values.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: Array2<f64>,
}

impl DenseMatrix {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data }
    }

    /// Build from a row-major buffer.
    pub fn from_shape_vec(n_rows: usize, n_cols: usize, values: Vec<f64>) -> Result<Self> {
        let expected = n_rows.checked_mul(n_cols).ok_or_else(|| {
            MultiStackError::InvalidInput(format!(
                "shape ({}, {}) overflows the element count",
                n_rows, n_cols
            ))
        })?;
        if values.len() != expected {
            return Err(MultiStackError::InvalidInput(format!(
                "dense data has {} values, shape ({}, {}) needs {}",
                values.len(),
                n_rows,
                n_cols,
                expected
            )));
        }
        Ok(Self::new(Array2::from_shape_vec((n_rows, n_cols), values)?))
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }
}

impl From<Array2<f64>> for DenseMatrix {
    fn from(data: Array2<f64>) -> Self {
        Self::new(data)
    }
}

impl Matrix for DenseMatrix {
    fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    fn vertical_concat(blocks: &[&Self]) -> Result<Self> {
        let Some(first) = blocks.first() else {
            return Err(MultiStackError::shape(
                "at least one block",
                "no blocks",
            ));
        };
        let n_cols = first.ncols();
        if let Some(bad) = blocks.iter().find(|b| b.ncols() != n_cols) {
            return Err(MultiStackError::shape(
                format!("{} columns", n_cols),
                format!("{} columns", bad.ncols()),
            ));
        }

        let views: Vec<_> = blocks.iter().map(|b| b.data.view()).collect();
        Ok(Self::new(concatenate(Axis(0), &views)?))
    }

    fn horizontal_concat(&self, right: &Self) -> Result<Self> {
        if self.nrows() != right.nrows() {
            return Err(MultiStackError::shape(
                format!("{} rows", self.nrows()),
                format!("{} rows", right.nrows()),
            ));
        }
        Ok(Self::new(concatenate(
            Axis(1),
            &[self.data.view(), right.data.view()],
        )?))
    }

    fn block_diagonal_ones(block_rows: usize, n_blocks: usize) -> Self {
        let mut data = Array2::zeros((block_rows * n_blocks, n_blocks));
        for j in 0..n_blocks {
            data.slice_mut(s![j * block_rows..(j + 1) * block_rows, j])
                .fill(1.0);
        }
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_block_diagonal_ones() {
        let m = DenseMatrix::block_diagonal_ones(2, 3);
        assert_eq!(
            m.into_array(),
            array![
                [1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_repeat_rows() {
        let m = DenseMatrix::new(array![[1.0, 2.0], [3.0, 4.0]]);
        let repeated = m.repeat_rows(2).unwrap();
        assert_eq!(
            repeated.into_array(),
            array![[1.0, 2.0], [3.0, 4.0], [1.0, 2.0], [3.0, 4.0]]
        );
    }

    #[test]
    fn test_horizontal_concat_row_mismatch() {
        let left = DenseMatrix::new(Array2::zeros((3, 1)));
        let right = DenseMatrix::new(Array2::zeros((2, 1)));
        let err = left.horizontal_concat(&right).unwrap_err();
        assert!(matches!(err, MultiStackError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_vertical_concat_column_mismatch() {
        let top = DenseMatrix::new(Array2::zeros((1, 2)));
        let bottom = DenseMatrix::new(Array2::zeros((1, 3)));
        assert!(DenseMatrix::vertical_concat(&[&top, &bottom]).is_err());
        assert!(DenseMatrix::vertical_concat(&[]).is_err());
    }

    #[test]
    fn test_from_shape_vec_length_check() {
        assert!(DenseMatrix::from_shape_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        assert!(matches!(
            DenseMatrix::from_shape_vec(usize::MAX, 2, vec![1.0]),
            Err(MultiStackError::InvalidInput(_))
        ));
        let m = DenseMatrix::from_shape_vec(1, 3, vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(m.shape(), (1, 3));
    }
}
