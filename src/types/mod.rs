//! Shared data structures for the dream prompt service
//!
//! - PhysiologySample: the ten sensor readings supplied per request
//! - Prediction: the (valence, arousal) pair produced by the model
//! - DreamRecord: one row of the precomputed dream table

mod physiology;
mod prediction;
mod dream;

pub use physiology::*;
pub use prediction::*;
pub use dream::*;
