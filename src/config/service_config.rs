//! Service configuration structs, loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DREAMSCAPE_CONFIG";
/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "dreamscape.toml";

pub const ENV_SERVER_ADDR: &str = "DREAMSCAPE_SERVER_ADDR";
pub const ENV_MODEL_PATH: &str = "DREAMSCAPE_MODEL_PATH";
pub const ENV_DATASET_PATH: &str = "DREAMSCAPE_DATASET_PATH";
pub const ENV_NEIGHBORS: &str = "DREAMSCAPE_NEIGHBORS";
/// Comma-separated list of allowed browser origins.
pub const ENV_CORS_ORIGINS: &str = "DREAMSCAPE_CORS_ORIGINS";

// ============================================================================
// Root
// ============================================================================

/// Complete service configuration.
///
/// Every section and field has a default, so a partial TOML file (or none
/// at all) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Allowed CORS origins. Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            max_body_bytes: default_max_body_bytes(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            dataset_path: default_dataset_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Number of similar dreams feeding the prompt.
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            neighbors: default_neighbors(),
        }
    }
}

fn default_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}
fn default_max_body_bytes() -> usize {
    defaults::MAX_BODY_BYTES
}
fn default_model_path() -> PathBuf {
    PathBuf::from(defaults::MODEL_PATH)
}
fn default_dataset_path() -> PathBuf {
    PathBuf::from(defaults::DATASET_PATH)
}
fn default_neighbors() -> usize {
    defaults::NEIGHBORS
}

// ============================================================================
// Loading
// ============================================================================

impl ServiceConfig {
    /// Load configuration using the standard search order:
    /// 1. `$DREAMSCAPE_CONFIG` environment variable
    /// 2. `./dreamscape.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// `DREAMSCAPE_*` environment overrides are applied on top, then the
    /// result is validated.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Same search order and overrides as [`load`](Self::load), without
    /// validating. Callers that layer further overrides (the CLI) validate
    /// once at the end.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_with(|key| std::env::var(key).ok())
    }

    /// [`resolve`](Self::resolve) reading variables through `lookup`.
    pub fn resolve_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::load_file_or_defaults(lookup(CONFIG_ENV))?;
        config.apply_overrides_from(lookup)?;
        Ok(config)
    }

    fn load_file_or_defaults(env_path: Option<String>) -> Result<Self, ConfigError> {
        // 1. Check env var
        if let Some(path) = env_path {
            let p = PathBuf::from(&path);
            if p.exists() {
                let config = Self::read_file(&p)?;
                info!(path = %p.display(), "Loaded config from {CONFIG_ENV}");
                return Ok(config);
            }
            warn!(path = %path, "{CONFIG_ENV} points to non-existent file, falling back");
        }

        // 2. Check ./dreamscape.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::read_file(&local)?;
            info!("Loaded config from ./{LOCAL_CONFIG_FILE}");
            return Ok(config);
        }

        // 3. Defaults
        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific TOML file, with no overrides.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Parse TOML text, logging unknown-key warnings first.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }
        toml::from_str(contents)
    }

    /// Apply `DREAMSCAPE_*` overrides using `lookup` to read variables.
    ///
    /// Taking a lookup function keeps tests away from the process
    /// environment.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ENV_SERVER_ADDR) {
            self.server.addr = addr;
        }
        if let Some(path) = lookup(ENV_MODEL_PATH) {
            self.artifacts.model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_DATASET_PATH) {
            self.artifacts.dataset_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_NEIGHBORS) {
            self.lookup.neighbors = raw.trim().parse().map_err(|_| {
                ConfigError::Validation(vec![format!(
                    "{ENV_NEIGHBORS} = '{raw}' is not a non-negative integer"
                )])
            })?;
        }
        if let Some(raw) = lookup(ENV_CORS_ORIGINS) {
            self.server.cors_origins = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate ranges. Warnings are logged; errors are returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
