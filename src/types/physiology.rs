//! Physiology sample: ten scalar sensor readings taken during sleep.

use serde::{Deserialize, Serialize};

/// Number of physiological features the model consumes.
pub const NUM_FEATURES: usize = 10;

/// Feature names in the order the model was trained on.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "eeg_theta_power",
    "eeg_gamma_power",
    "eeg_delta_power",
    "heart_rate_bpm",
    "hrv_ms",
    "rem_bursts",
    "chin_emg",
    "respiration_rate",
    "resp_irregularity",
    "skin_conductance",
];

/// One reading of every physiological channel.
///
/// Every field is required. Integer JSON values (e.g. `"rem_bursts": 1`) are
/// accepted; unknown extra keys are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysiologySample {
    /// EEG theta band power
    pub eeg_theta_power: f64,
    /// EEG gamma band power
    pub eeg_gamma_power: f64,
    /// EEG delta band power
    pub eeg_delta_power: f64,
    /// Heart rate (beats per minute)
    pub heart_rate_bpm: f64,
    /// Heart rate variability (ms)
    pub hrv_ms: f64,
    /// Rapid eye movement bursts in the window
    pub rem_bursts: f64,
    /// Chin electromyography amplitude
    pub chin_emg: f64,
    /// Breaths per minute
    pub respiration_rate: f64,
    /// Breathing irregularity index
    pub resp_irregularity: f64,
    /// Electrodermal activity (microsiemens)
    pub skin_conductance: f64,
}

impl PhysiologySample {
    /// Feature vector in [`FEATURE_NAMES`] order.
    pub const fn to_features(&self) -> [f64; NUM_FEATURES] {
        [
            self.eeg_theta_power,
            self.eeg_gamma_power,
            self.eeg_delta_power,
            self.heart_rate_bpm,
            self.hrv_ms,
            self.rem_bursts,
            self.chin_emg,
            self.respiration_rate,
            self.resp_irregularity,
            self.skin_conductance,
        ]
    }
}
