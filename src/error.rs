//! Error types shared across the request path.
//!
//! Per-layer errors (`ModelError`, `DatasetError`, `ConfigError`) live with
//! their modules; this file holds the ones that cross layer boundaries.

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::model::{ModelError, PredictError};

/// Request body could not be turned into a physiology sample.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Malformed JSON body: {0}")]
    Syntax(String),

    #[error("Invalid physiology payload: {0}")]
    Schema(String),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Data => Self::Schema(err.to_string()),
            Category::Io | Category::Syntax | Category::Eof => Self::Syntax(err.to_string()),
        }
    }
}

/// A startup artifact (model or dream table) could not be loaded.
#[derive(Debug, Error)]
pub enum StartupLoadError {
    #[error("model artifact: {0}")]
    Model(#[from] ModelError),

    #[error("dream table: {0}")]
    Dataset(#[from] DatasetError),
}

/// Failure while serving one generation request.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictError),
}
