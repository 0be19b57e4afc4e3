//! Error types for multistack.

use ndarray::ShapeError;
use thiserror::Error;

/// Result type alias for multistack operations.
pub type Result<T> = std::result::Result<T, MultiStackError>;

/// Errors that can occur in multistack operations.
#[derive(Error, Debug)]
pub enum MultiStackError {
    /// Shape mismatch between arrays, or a dimension that cannot be split.
    #[error("Shape mismatch: expected {expected_shape}, got {actual_shape}")]
    ShapeMismatch {
        expected_shape: String,
        actual_shape: String,
    },
    /// A matrix representation that is neither dense nor a supported sparse layout.
    #[error("Unsupported matrix representation: {0}")]
    UnsupportedRepresentation(String),
    /// Invalid parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Invalid input data.
    #[error("Invalid input data: {0}")]
    InvalidInput(String),
    /// An error reported by the training service.
    #[error("Backend error: {0}")]
    BackendError(String),
    /// An IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// A serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// The model has not been trained yet.
    #[error("Model is not trained yet")]
    ModelNotTrained,
}

impl MultiStackError {
    pub(crate) fn shape(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        MultiStackError::ShapeMismatch {
            expected_shape: expected.into(),
            actual_shape: actual.into(),
        }
    }
}

impl From<ShapeError> for MultiStackError {
    fn from(err: ShapeError) -> Self {
        MultiStackError::ShapeMismatch {
            expected_shape: "unknown".to_string(),
            actual_shape: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MultiStackError {
    fn from(err: serde_json::Error) -> Self {
        MultiStackError::SerializationError(err.to_string())
    }
}
