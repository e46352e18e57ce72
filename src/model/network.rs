//! Sequence regressor: evaluates a validated [`ModelArtifact`].

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

use crate::features::{FeatureSequence, SEQUENCE_LEN};
use crate::model::artifact::{self, ModelArtifact, ModelError, FORMAT_VERSION, NUM_OUTPUTS};
use crate::model::layers::{Activation, DenseLayer, Layer, LstmLayer};
use crate::model::{EmotionPredictor, PredictError};
use crate::types::{Prediction, NUM_FEATURES};

/// Recurrent regressor mapping a physiology sequence to (valence, arousal).
#[derive(Debug, Clone)]
pub struct SequenceRegressor {
    artifact: ModelArtifact,
}

impl SequenceRegressor {
    /// Wrap an artifact after validating it.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// Load a model artifact from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact = artifact::load_from_disk(path)?;
        Ok(Self { artifact })
    }

    /// Deterministic randomly initialised model: one LSTM layer with `units`
    /// cells and a tanh dense head.
    ///
    /// Untrained; useful for running the service end to end without the
    /// original training environment.
    pub fn seeded(seed: u64, units: usize) -> Self {
        let units = units.max(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let lstm = LstmLayer::init(NUM_FEATURES, units, false, &mut rng);
        let head = DenseLayer::init(units, NUM_OUTPUTS, Activation::Tanh, &mut rng);
        Self {
            artifact: ModelArtifact {
                format_version: FORMAT_VERSION,
                timesteps: SEQUENCE_LEN,
                features: NUM_FEATURES,
                layers: vec![Layer::Lstm(lstm), Layer::Dense(head)],
            },
        }
    }

    pub const fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Write the artifact to disk.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        artifact::save_to_disk(&self.artifact, path)
    }

    /// Raw forward pass. Output length equals the final layer width.
    fn forward(&self, input: &FeatureSequence) -> Vec<f32> {
        let mut sequence: Vec<Vec<f32>> = input.timesteps().map(|row| row.to_vec()).collect();
        let mut vector: Vec<f32> = Vec::new();

        for layer in &self.artifact.layers {
            match layer {
                Layer::Lstm(lstm) => {
                    let mut states = lstm.forward(&sequence);
                    if lstm.return_sequences {
                        sequence = states;
                    } else {
                        vector = states.pop().unwrap_or_else(|| vec![0.0; lstm.units]);
                    }
                }
                Layer::Dense(dense) => {
                    vector = dense.forward(&vector);
                }
            }
        }

        vector
    }
}

impl EmotionPredictor for SequenceRegressor {
    fn predict(&self, input: &FeatureSequence) -> Result<Prediction, PredictError> {
        let expected = (1, self.artifact.timesteps, self.artifact.features);
        let actual = input.shape();
        if actual != expected {
            return Err(PredictError::InputShape { expected, actual });
        }

        let output = self.forward(input);
        let &[valence, arousal] = output.as_slice() else {
            return Err(PredictError::OutputWidth(output.len()));
        };

        let prediction = Prediction::new(f64::from(valence), f64::from(arousal));
        if !prediction.valence.is_finite() || !prediction.arousal.is_finite() {
            return Err(PredictError::NonFinite);
        }
        Ok(prediction)
    }

    fn describe(&self) -> String {
        let layers: Vec<String> = self
            .artifact
            .layers
            .iter()
            .map(|l| format!("{}({})", l.kind(), l.units()))
            .collect();
        format!("{} [{} params]", layers.join(" -> "), self.artifact.num_params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PhysiologySample;

    fn sample() -> PhysiologySample {
        PhysiologySample {
            eeg_theta_power: 91.9,
            eeg_gamma_power: 14.8,
            eeg_delta_power: 80.5,
            heart_rate_bpm: 80.8,
            hrv_ms: 41.0,
            rem_bursts: 1.0,
            chin_emg: 12.7,
            respiration_rate: 12.3,
            resp_irregularity: 0.041,
            skin_conductance: 2.35,
        }
    }

    // Inputs are not normalised, so the values carry no meaning; only shape
    // and determinism are checked.
    #[test]
    fn test_prediction_is_finite_and_deterministic() {
        let model = SequenceRegressor::seeded(42, 16);
        let input = FeatureSequence::assemble(&sample());

        let a = model.predict(&input).unwrap();
        let b = model.predict(&input).unwrap();
        assert_eq!(a, b);
        assert!(a.valence.is_finite() && a.arousal.is_finite());
        // tanh head keeps outputs inside [-1, 1]
        assert!(a.valence.abs() <= 1.0 && a.arousal.abs() <= 1.0);
    }

    #[test]
    fn test_same_seed_same_model() {
        let input = FeatureSequence::assemble(&sample());
        let a = SequenceRegressor::seeded(7, 8).predict(&input).unwrap();
        let b = SequenceRegressor::seeded(7, 8).predict(&input).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            SequenceRegressor::seeded(7, 8).artifact(),
            SequenceRegressor::seeded(7, 8).artifact()
        );
    }

    #[test]
    fn test_save_load_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dream_model.json");
        let model = SequenceRegressor::seeded(3, 12);
        model.save(&path).unwrap();

        let loaded = SequenceRegressor::load(&path).unwrap();
        let input = FeatureSequence::assemble(&sample());
        assert_eq!(model.predict(&input).unwrap(), loaded.predict(&input).unwrap());
    }

    #[test]
    fn test_stacked_model_runs() {
        let mut rng = StdRng::seed_from_u64(11);
        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            timesteps: SEQUENCE_LEN,
            features: NUM_FEATURES,
            layers: vec![
                Layer::Lstm(LstmLayer::init(NUM_FEATURES, 6, true, &mut rng)),
                Layer::Lstm(LstmLayer::init(6, 4, false, &mut rng)),
                Layer::Dense(DenseLayer::init(4, 4, Activation::Relu, &mut rng)),
                Layer::Dense(DenseLayer::init(4, 2, Activation::Linear, &mut rng)),
            ],
        };
        let model = SequenceRegressor::from_artifact(artifact).unwrap();
        let prediction = model.predict(&FeatureSequence::assemble(&sample())).unwrap();
        assert!(prediction.valence.is_finite());
        assert!(model.describe().starts_with("lstm(6) -> lstm(4) -> dense(4) -> dense(2)"));
    }

    #[test]
    fn test_from_artifact_rejects_invalid() {
        let mut artifact = SequenceRegressor::seeded(1, 4).artifact().clone();
        artifact.layers.pop();
        assert!(SequenceRegressor::from_artifact(artifact).is_err());
    }
}
