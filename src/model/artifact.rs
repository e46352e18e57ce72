//! Model artifact: the serialized weight file exported after training.
//!
//! The artifact is plain JSON so it can be produced by any training stack.
//! Loading validates the whole layer chain up front; a model that loads is
//! guaranteed to accept a (1, 10, 10) input and emit exactly two values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::features::SEQUENCE_LEN;
use crate::model::layers::Layer;
use crate::types::NUM_FEATURES;

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

/// Number of model outputs: (valence, arousal).
pub const NUM_OUTPUTS: usize = 2;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported artifact format version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u32),

    #[error("invalid model shape: {0}")]
    Shape(String),
}

/// Serialized sequence regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Input timesteps the model was trained on.
    pub timesteps: usize,
    /// Input features per timestep.
    pub features: usize,
    /// Recurrent block (one or more LSTM layers) followed by a dense head.
    pub layers: Vec<Layer>,
}

impl ModelArtifact {
    /// Validate versions, input geometry and the layer chain.
    ///
    /// Rules:
    /// - input is (SEQUENCE_LEN, NUM_FEATURES)
    /// - layers start with one or more LSTM layers; every LSTM except the
    ///   last returns sequences, the last one does not
    /// - only dense layers follow the recurrent block
    /// - each layer's weights match the width of the layer before it
    /// - the final layer has NUM_OUTPUTS units
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format_version != FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(self.format_version));
        }
        if self.timesteps != SEQUENCE_LEN || self.features != NUM_FEATURES {
            return Err(ModelError::Shape(format!(
                "input is ({}, {}), service provides ({SEQUENCE_LEN}, {NUM_FEATURES})",
                self.timesteps, self.features
            )));
        }
        if self.layers.is_empty() {
            return Err(ModelError::Shape("model has no layers".to_string()));
        }

        let recurrent = self
            .layers
            .iter()
            .take_while(|l| matches!(l, Layer::Lstm(_)))
            .count();
        if recurrent == 0 {
            return Err(ModelError::Shape(
                "first layer must be an lstm layer".to_string(),
            ));
        }

        let mut width = self.features;
        for (i, layer) in self.layers.iter().enumerate() {
            let check = match layer {
                Layer::Lstm(lstm) => {
                    if i >= recurrent {
                        Err("lstm layer after the dense head".to_string())
                    } else if i + 1 < recurrent && !lstm.return_sequences {
                        Err("stacked lstm layer must set return_sequences".to_string())
                    } else if i + 1 == recurrent && lstm.return_sequences {
                        Err("last lstm layer must not return sequences".to_string())
                    } else {
                        lstm.check_shape(width)
                    }
                }
                Layer::Dense(dense) => dense.check_shape(width),
            };
            check.map_err(|msg| ModelError::Shape(format!("layer {i} ({}): {msg}", layer.kind())))?;
            width = layer.units();
        }

        if width != NUM_OUTPUTS {
            return Err(ModelError::Shape(format!(
                "final layer has {width} units, expected {NUM_OUTPUTS}"
            )));
        }
        Ok(())
    }

    /// Total number of weights and biases.
    pub fn num_params(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match layer {
                Layer::Lstm(l) => {
                    l.kernel.iter().map(Vec::len).sum::<usize>()
                        + l.recurrent_kernel.iter().map(Vec::len).sum::<usize>()
                        + l.bias.len()
                }
                Layer::Dense(d) => d.kernel.iter().map(Vec::len).sum::<usize>() + d.bias.len(),
            })
            .sum()
    }
}

/// Save an artifact atomically (write temp file, then rename).
pub fn save_to_disk(artifact: &ModelArtifact, path: &Path) -> Result<(), ModelError> {
    let json = serde_json::to_vec(artifact)?;
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = path.with_extension("json.tmp");
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    std::fs::write(&tmp_path, &json).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;
    Ok(())
}

/// Load and validate an artifact from disk.
pub fn load_from_disk(path: &Path) -> Result<ModelArtifact, ModelError> {
    let data = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact = serde_json::from_slice(&data)?;
    artifact.validate()?;
    Ok(artifact)
}
