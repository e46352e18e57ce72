//! Emotion predictor: physiology sequence -> (valence, arousal).
//!
//! The model is trained elsewhere and shipped as a JSON weight artifact
//! (see [`artifact`]). This module only evaluates it.
//!
//! ## Known caveat
//!
//! The network was trained on scaled inputs, but the scaler is not part of
//! the artifact and the service feeds raw sensor values. Predictions are
//! therefore numerically unreliable. They are finite, two-dimensional and
//! deterministic for a fixed artifact, and nothing more should be assumed.

pub mod artifact;
pub mod layers;
pub mod network;

pub use artifact::{ModelArtifact, ModelError};
pub use network::SequenceRegressor;

use thiserror::Error;

use crate::features::FeatureSequence;
use crate::types::Prediction;

/// Per-request inference failure.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("input shape {actual:?} does not match model input {expected:?}")]
    InputShape {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("model produced {0} outputs, expected 2")]
    OutputWidth(usize),

    #[error("model produced a non-finite prediction")]
    NonFinite,
}

/// Black-box mapping from an assembled feature sequence to a prediction.
///
/// Implementations are loaded once and shared read-only across requests.
pub trait EmotionPredictor: Send + Sync {
    fn predict(&self, input: &FeatureSequence) -> Result<Prediction, PredictError>;

    /// Short human-readable summary for startup logs.
    fn describe(&self) -> String {
        "emotion predictor".to_string()
    }
}
