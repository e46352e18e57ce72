//! Feature assembly: request body -> fixed-shape model input.
//!
//! The model expects a (batch, timesteps, features) tensor of shape
//! (1, 10, 10). Requests carry a single reading, so that reading is
//! replicated across all ten timesteps. This is not a real time series; the
//! model sees a constant sequence.

use crate::error::ValidationError;
use crate::types::{PhysiologySample, NUM_FEATURES};

/// Number of timesteps in the model input window.
pub const SEQUENCE_LEN: usize = 10;

/// Model input tensor with batch size 1.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSequence {
    steps: [[f32; NUM_FEATURES]; SEQUENCE_LEN],
}

impl FeatureSequence {
    /// Replicate one physiology reading across every timestep.
    #[allow(clippy::cast_possible_truncation)]
    pub fn assemble(sample: &PhysiologySample) -> Self {
        let features = sample.to_features();
        let mut row = [0.0_f32; NUM_FEATURES];
        for (dst, &src) in row.iter_mut().zip(features.iter()) {
            // The model was exported in float32.
            *dst = src as f32;
        }
        Self {
            steps: [row; SEQUENCE_LEN],
        }
    }

    /// Tensor shape as (batch, timesteps, features).
    pub const fn shape(&self) -> (usize, usize, usize) {
        (1, SEQUENCE_LEN, NUM_FEATURES)
    }

    /// Feature row at timestep `index`.
    pub fn timestep(&self, index: usize) -> Option<&[f32; NUM_FEATURES]> {
        self.steps.get(index)
    }

    /// Iterate timesteps in order.
    pub fn timesteps(&self) -> impl Iterator<Item = &[f32; NUM_FEATURES]> {
        self.steps.iter()
    }

    /// Row-major copy of the tensor data.
    pub fn to_flat(&self) -> Vec<f32> {
        self.steps.iter().flatten().copied().collect()
    }
}

/// Parse and validate a raw JSON request body.
///
/// Missing keys, non-numeric values and malformed JSON all map to
/// [`ValidationError`] with the underlying message.
pub fn parse_sample(body: &[u8]) -> Result<PhysiologySample, ValidationError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    // serde would also accept a bare 10-element array for the struct
    if !value.is_object() {
        return Err(ValidationError::Schema(
            "request body must be a JSON object".to_string(),
        ));
    }
    let sample: PhysiologySample = serde_json::from_value(value)?;
    Ok(sample)
}
