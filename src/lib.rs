//! # multistack
//!
//! Fit multi-output regression problems with single-output regression services.
//!
//! A problem with `n` samples, `f` features and `k` outputs is stacked into a
//! single-output problem with `n * k` rows: the features are repeated once per
//! output and tagged with a one-hot indicator column block, and the targets are
//! flattened column by column. Predictions on the stacked rows are folded back
//! into an `n x k` matrix.
//!
//! Dense (`ndarray`) and compressed sparse row matrices are supported; sparse
//! inputs stay sparse throughout.
//!
//! ## Example
//!
//! ```
//! use multistack::prelude::*;
//! use ndarray::array;
//!
//! let x = FeatureMatrix::from(array![[1.0], [2.0]]);
//! let y = array![[10.0, 100.0], [20.0, 200.0]];
//!
//! let stacked = forward_transform(&x, y.view())?;
//! assert_eq!(stacked.features.shape(), (4, 3));
//! assert_eq!(stacked.targets, array![10.0, 20.0, 100.0, 200.0]);
//!
//! let recovered = inverse_transform(&stacked.targets.view(), 2)?;
//! assert_eq!(recovered, y);
//! # Ok::<(), MultiStackError>(())
//! ```

pub mod datasets;
pub mod encoder;
pub mod error;
pub mod matrix;
pub mod model;
pub mod service;
pub mod types;
pub mod utils;

pub mod prelude {
    //! Convenient re-exports of commonly used types.
    pub use crate::encoder::{
        StackedData, forward_transform, inverse_transform, stack_features,
    };
    pub use crate::error::{MultiStackError, Result};
    pub use crate::matrix::{CsrMatrix, DenseMatrix, FeatureMatrix, Matrix, MatrixFormat};
    pub use crate::model::MultiOutputRegressor;
    pub use crate::service::{
        FittedPredictor, PrimaryMetric, SubmitConfig, Task, TrainingService, Verbosity,
    };
    pub use crate::types::TargetData;
}
