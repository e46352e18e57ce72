//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:5000";

/// Largest accepted request body (bytes). A physiology payload is ~300 bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Smallest `server.max_body_bytes` the validator accepts.
pub const MIN_BODY_BYTES: usize = 1024;

// ============================================================================
// Artifacts
// ============================================================================

/// Model weight artifact exported from training.
pub const MODEL_PATH: &str = "dream_model.json";

/// Precomputed dream table produced by `prepare-dreams`.
pub const DATASET_PATH: &str = "processed_dreams.csv";

// ============================================================================
// Lookup
// ============================================================================

/// Dreams pulled from the table per request.
pub const NEIGHBORS: usize = crate::similarity::DEFAULT_NEIGHBORS;

/// Above this, the prompt is dominated by far-away dreams; warn only.
pub const NEIGHBORS_WARN_ABOVE: usize = 50;

// ============================================================================
// Demo model
// ============================================================================

/// LSTM width for `dreamscape demo-model`.
pub const DEMO_MODEL_UNITS: usize = 32;

/// Seed for `dreamscape demo-model`.
pub const DEMO_MODEL_SEED: u64 = 42;
