//! Service Configuration Module
//!
//! Bind address, artifact paths and lookup size, loaded from TOML with
//! environment overrides.
//!
//! ## Loading Order
//!
//! 1. `DREAMSCAPE_CONFIG` environment variable (path to TOML file)
//! 2. `dreamscape.toml` in the current working directory
//! 3. Built-in defaults
//!
//! `DREAMSCAPE_*` variables override file values; CLI flags in the server
//! binary override both. Validation runs once, after every override.
//!
//! ## Usage
//!
//! The config is loaded once in `main` and passed down explicitly:
//!
//! ```ignore
//! let mut config = ServiceConfig::resolve()?;
//! args.apply_to(&mut config);
//! config.validate()?;
//! let ctx = AppContext::load(&config);
//! ```

mod service_config;
pub mod defaults;
pub mod validation;

pub use service_config::*;
