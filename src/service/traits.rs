//! Training service trait definitions.

use super::config::SubmitConfig;
use crate::error::Result;
use crate::matrix::FeatureMatrix;
use ndarray::Array1;

/// A fitted single-output model returned by a training service.
pub trait FittedPredictor {
    /// Predict one value per row of `features`.
    fn predict(&self, features: &FeatureMatrix) -> Result<Array1<f64>>;
}

/// An external single-output regression service.
///
/// Implementations wrap whatever actually trains the model (a managed AutoML
/// job, a local library, a test double). The service sees only the stacked
/// single-output problem.
///
/// # Example
///
/// ```rust,ignore
/// use multistack::service::{FittedPredictor, SubmitConfig, TrainingService};
///
/// struct RemoteService { client: Client }
///
/// impl TrainingService for RemoteService {
///     type Predictor = RemoteModel;
///
///     fn name(&self) -> &str {
///         "remote"
///     }
///
///     fn submit(
///         &self,
///         config: &SubmitConfig,
///         features: &FeatureMatrix,
///         targets: &Array1<f64>,
///     ) -> Result<RemoteModel> {
///         let run = self.client.start_run(config, features, targets)?;
///         run.wait_for_best_model()
///     }
/// }
/// ```
pub trait TrainingService {
    /// The fitted model type.
    type Predictor: FittedPredictor;

    /// Service name, used in log output.
    fn name(&self) -> &str;

    /// Train on `features` / `targets` and return the best fitted model.
    ///
    /// `targets` has exactly one value per row of `features`.
    fn submit(
        &self,
        config: &SubmitConfig,
        features: &FeatureMatrix,
        targets: &Array1<f64>,
    ) -> Result<Self::Predictor>;
}
