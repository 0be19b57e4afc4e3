//! Submission configuration handed to the training service.

use crate::error::{MultiStackError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of learning task the service is asked to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Regression,
    Classification,
    Forecasting,
}

/// Metric the service optimizes when ranking candidate models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMetric {
    SpearmanCorrelation,
    NormalizedRootMeanSquaredError,
    R2Score,
    NormalizedMeanAbsoluteError,
}

/// How much progress output the service should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Quiet,
    Info,
    Debug,
}

/// Configuration for a single submission.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Learning task.
    pub task: Task,
    /// Metric used to rank candidate models.
    pub primary_metric: PrimaryMetric,
    /// Number of candidate models the service may try.
    pub iterations: usize,
    /// Number of cross-validation folds.
    pub n_cross_validations: usize,
    /// Progress output level.
    pub verbosity: Verbosity,
    /// Where the service writes its artifacts.
    pub output_path: PathBuf,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            task: Task::Regression,
            primary_metric: PrimaryMetric::NormalizedRootMeanSquaredError,
            iterations: 10,
            n_cross_validations: 5,
            verbosity: Verbosity::Info,
            output_path: PathBuf::from("./outputs"),
        }
    }
}

impl SubmitConfig {
    pub fn with_task(mut self, task: Task) -> Self {
        self.task = task;
        self
    }

    pub fn with_primary_metric(mut self, metric: PrimaryMetric) -> Self {
        self.primary_metric = metric;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_n_cross_validations(mut self, n_cross_validations: usize) -> Self {
        self.n_cross_validations = n_cross_validations;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    /// Check the numeric budget fields.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(MultiStackError::InvalidParameter(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.n_cross_validations < 2 {
            return Err(MultiStackError::InvalidParameter(format!(
                "n_cross_validations must be at least 2, got {}",
                self.n_cross_validations
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| MultiStackError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
