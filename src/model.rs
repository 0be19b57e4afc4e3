use crate::encoder::{forward_transform, inverse_transform, stack_features};
use crate::error::{MultiStackError, Result};
use crate::matrix::FeatureMatrix;
use crate::service::{FittedPredictor, SubmitConfig, Task, TrainingService};
use crate::types::TargetData;
use ndarray::Array2;
use tracing::{debug, info};

/// State recorded after a successful fit.
struct Fitted<P> {
    predictor: P,
    n_features: usize,
    n_outputs: usize,
}

/// Multi-output regressor backed by a single-output training service.
///
/// `fit` stacks the problem with `forward_transform` and submits it;
/// `predict` stacks the features for the fitted number of outputs, asks the
/// service's predictor for flat predictions and folds them back.
///
/// # Example
///
/// ```rust,ignore
/// let mut model = MultiOutputRegressor::new(service, SubmitConfig::default());
/// model.fit(&x_train, y_train.view())?;
/// let y_pred = model.predict(&x_test)?; // n_test x k
/// ```
pub struct MultiOutputRegressor<S: TrainingService> {
    service: S,
    config: SubmitConfig,
    fitted: Option<Fitted<S::Predictor>>,
}

impl<S: TrainingService> MultiOutputRegressor<S> {
    pub fn new(service: S, config: SubmitConfig) -> Self {
        Self {
            service,
            config,
            fitted: None,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of outputs seen during `fit`.
    pub fn n_outputs(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.n_outputs)
    }

    /// Number of original (unstacked) features seen during `fit`.
    pub fn n_features(&self) -> Option<usize> {
        self.fitted.as_ref().map(|f| f.n_features)
    }

    /// The fitted single-output predictor.
    pub fn predictor(&self) -> Option<&S::Predictor> {
        self.fitted.as_ref().map(|f| &f.predictor)
    }

    /// Fit the model on `features` and a single- or multi-output target.
    ///
    /// A previous fit is only replaced once the new submission succeeds.
    pub fn fit<'a>(
        &mut self,
        features: &FeatureMatrix,
        targets: impl Into<TargetData<'a>>,
    ) -> Result<()> {
        self.config.validate()?;
        if self.config.task != Task::Regression {
            return Err(MultiStackError::InvalidParameter(format!(
                "multi-output stacking needs a regression task, got {:?}",
                self.config.task
            )));
        }

        let stacked = forward_transform(features, targets)?;
        info!(
            service = self.service.name(),
            n_samples = stacked.n_samples,
            n_outputs = stacked.n_outputs,
            stacked_rows = stacked.features.nrows(),
            stacked_cols = stacked.features.ncols(),
            "submitting stacked regression problem"
        );

        let predictor = self
            .service
            .submit(&self.config, &stacked.features, &stacked.targets)?;

        self.fitted = Some(Fitted {
            predictor,
            n_features: features.ncols(),
            n_outputs: stacked.n_outputs,
        });
        Ok(())
    }

    /// Predict all outputs for each row of `features`.
    ///
    /// Returns an `n_samples x n_outputs` matrix.
    pub fn predict(&self, features: &FeatureMatrix) -> Result<Array2<f64>> {
        let fitted = self
            .fitted
            .as_ref()
            .ok_or(MultiStackError::ModelNotTrained)?;

        if features.ncols() != fitted.n_features {
            return Err(MultiStackError::shape(
                format!("{} features", fitted.n_features),
                format!("{} features", features.ncols()),
            ));
        }

        let stacked = stack_features(features, fitted.n_outputs)?;
        let flat = fitted.predictor.predict(&stacked)?;

        let expected = stacked.nrows();
        if flat.len() != expected {
            return Err(MultiStackError::shape(
                format!("{} predictions", expected),
                format!("{} predictions", flat.len()),
            ));
        }

        debug!(
            n_samples = features.nrows(),
            n_outputs = fitted.n_outputs,
            "unstacking predictions"
        );
        inverse_transform(&flat.view(), fitted.n_outputs)
    }
}
