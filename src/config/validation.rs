//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Every valid dotted key path for `ServiceConfig`.
///
/// Must be kept in step with the structs in `service_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        "server.max_body_bytes",
        "server.cors_origins",
        // [artifacts]
        "artifacts",
        "artifacts.model_path",
        "artifacts.dataset_path",
        // [lookup]
        "lookup",
        "lookup.neighbors",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Closest known key within edit distance 3. Ties go to the alphabetically
/// first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Only warns; parse errors are left to serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Check values on a parsed config.
///
/// Returns (errors, warnings). Errors must prevent startup; warnings are
/// suspicious but not fatal.
pub fn validate_ranges(config: &super::ServiceConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.lookup.neighbors == 0 {
        errors.push("lookup.neighbors = 0 must be >= 1".to_string());
    } else if config.lookup.neighbors > defaults::NEIGHBORS_WARN_ABOVE {
        warnings.push(ValidationWarning {
            field: "lookup.neighbors".to_string(),
            message: format!(
                "lookup.neighbors = {} is unusually large (prompts will average over distant dreams)",
                config.lookup.neighbors
            ),
            suggestion: None,
        });
    }

    if config.server.max_body_bytes < defaults::MIN_BODY_BYTES {
        errors.push(format!(
            "server.max_body_bytes = {} must be >= {}",
            config.server.max_body_bytes,
            defaults::MIN_BODY_BYTES
        ));
    }

    if config.server.addr.trim().is_empty() {
        errors.push("server.addr must not be empty".to_string());
    }
    if config.artifacts.model_path.as_os_str().is_empty() {
        errors.push("artifacts.model_path must not be empty".to_string());
    }
    if config.artifacts.dataset_path.as_os_str().is_empty() {
        errors.push("artifacts.dataset_path must not be empty".to_string());
    }

    (errors, warnings)
}
