//! Dreamscape: physiology-driven dream prompts
//!
//! Turns one sleep physiology reading into an image-generation prompt.
//!
//! ## Architecture
//!
//! - **Features**: validate the JSON reading and replicate it into a
//!   (1, 10, 10) input sequence
//! - **Model**: recurrent regressor predicting (valence, arousal)
//! - **Similarity**: nearest dreams in the precomputed table
//! - **Prompt**: most frequent theme, setting and emotion among them
//! - **API**: `POST /generate_dream`, `GET /health`
//!
//! The dream table is produced offline by the `prepare-dreams` binary.

pub mod api;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod features;
pub mod model;
pub mod prepare;
pub mod prompt;
pub mod similarity;
pub mod types;

// Re-export configuration
pub use config::ServiceConfig;

// Re-export commonly used types
pub use types::{DreamRecord, PhysiologySample, Prediction, TagField};

// Re-export the request path
pub use dataset::DreamTable;
pub use engine::{AppContext, DreamEngine, DreamResponse};
pub use error::{GenerateError, StartupLoadError, ValidationError};
pub use features::FeatureSequence;
pub use model::{EmotionPredictor, PredictError, SequenceRegressor};
