//! Model output in valence/arousal space.

use serde::{Deserialize, Serialize};

/// Predicted affect for one request.
///
/// Valence is positive/negative tone, arousal is intensity. The dream table
/// stores both in [-1, 1]; model outputs are not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub valence: f64,
    pub arousal: f64,
}

impl Prediction {
    pub const fn new(valence: f64, arousal: f64) -> Self {
        Self { valence, arousal }
    }

    /// Euclidean distance to another point in valence/arousal space.
    pub fn distance_to(&self, valence: f64, arousal: f64) -> f64 {
        let dv = valence - self.valence;
        let da = arousal - self.arousal;
        (dv * dv + da * da).sqrt()
    }
}
