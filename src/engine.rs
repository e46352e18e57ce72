//! Request orchestration and the application context.
//!
//! `AppContext` is built once at startup and handed to the router as state.
//! It owns the loaded model and dream table behind `Arc`s; nothing in it is
//! mutated after construction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::ServiceConfig;
use crate::dataset::DreamTable;
use crate::error::{GenerateError, StartupLoadError};
use crate::features::FeatureSequence;
use crate::model::{EmotionPredictor, SequenceRegressor};
use crate::prompt::build_prompt;
use crate::similarity::find_similar;
use crate::types::{PhysiologySample, Prediction};

/// Successful `/generate_dream` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DreamResponse {
    pub prompt: String,
    pub predicted_emotion: Prediction,
}

/// Loaded model plus dream table.
pub struct DreamEngine {
    predictor: Arc<dyn EmotionPredictor>,
    table: Arc<DreamTable>,
    neighbors: usize,
}

impl DreamEngine {
    pub fn new(predictor: Arc<dyn EmotionPredictor>, table: Arc<DreamTable>, neighbors: usize) -> Self {
        Self {
            predictor,
            table,
            neighbors,
        }
    }

    /// Load both artifacts named in the config.
    pub fn load(config: &ServiceConfig) -> Result<Self, StartupLoadError> {
        let model = SequenceRegressor::load(&config.artifacts.model_path)?;
        info!(
            path = %config.artifacts.model_path.display(),
            model = %model.describe(),
            "Loaded model artifact"
        );
        let table = DreamTable::load(&config.artifacts.dataset_path)?;
        Ok(Self::new(
            Arc::new(model),
            Arc::new(table),
            config.lookup.neighbors,
        ))
    }

    pub fn table(&self) -> &DreamTable {
        &self.table
    }

    pub const fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Full request path: assemble -> predict -> lookup -> prompt.
    pub fn generate(&self, sample: &PhysiologySample) -> Result<DreamResponse, GenerateError> {
        let input = FeatureSequence::assemble(sample);
        let prediction = self.predictor.predict(&input)?;
        Ok(self.generate_from_prediction(prediction))
    }

    /// Lookup and prompt for an already predicted point.
    pub fn generate_from_prediction(&self, prediction: Prediction) -> DreamResponse {
        let similar = find_similar(self.table.records(), prediction, self.neighbors);
        debug!(
            valence = prediction.valence,
            arousal = prediction.arousal,
            neighbors = similar.len(),
            "Selected similar dreams"
        );
        DreamResponse {
            prompt: build_prompt(&similar),
            predicted_emotion: prediction,
        }
    }
}

/// Immutable application context shared by every request.
#[derive(Clone)]
pub struct AppContext {
    engine: Result<Arc<DreamEngine>, Arc<str>>,
    started_at: DateTime<Utc>,
}

impl AppContext {
    /// Context with a ready engine.
    pub fn ready(engine: DreamEngine) -> Self {
        Self {
            engine: Ok(Arc::new(engine)),
            started_at: Utc::now(),
        }
    }

    /// Context whose artifacts failed to load. The service stays up but
    /// every generation request is answered with a server error.
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self {
            engine: Err(Arc::from(reason.into())),
            started_at: Utc::now(),
        }
    }

    /// Load artifacts from the config, degrading instead of failing.
    pub fn load(config: &ServiceConfig) -> Self {
        match DreamEngine::load(config) {
            Ok(engine) => Self::ready(engine),
            Err(e) => {
                error!(
                    error = %e,
                    model = %config.artifacts.model_path.display(),
                    dataset = %config.artifacts.dataset_path.display(),
                    "Failed to load startup artifacts; /generate_dream will return 500"
                );
                Self::degraded(e.to_string())
            }
        }
    }

    pub fn engine(&self) -> Option<&DreamEngine> {
        self.engine.as_deref().ok()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.engine.as_ref().err().map(|reason| &**reason)
    }

    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
