//! Contract with the external training service.
//!
//! The service itself (workspace setup, job submission, remote training) lives
//! outside this crate; it is reached through the `TrainingService` trait.

mod config;
mod traits;

pub use config::{PrimaryMetric, SubmitConfig, Task, Verbosity};
pub use traits::{FittedPredictor, TrainingService};
