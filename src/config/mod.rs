//! Configuration management for auditscan
//!
//! Settings are layered from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use auditscan::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Pattern: `AUDITSCAN__<section>__<key>`
//!
//! - `AUDITSCAN__SERVER__BIND_ADDR=127.0.0.1:9000`
//! - `AUDITSCAN__SERVER__MAX_UPLOAD_BYTES=20MB`
//! - `AUDITSCAN__AUDIT__IDENTIFIER_PRECEDENCE=image`
//! - `AUDITSCAN__CORS__ALLOWED_ORIGINS=https://a.example,https://b.example`
//!
//! # Configuration File
//!
//! Read from `config/auditscan.toml` unless `AUDITSCAN_CONFIG` points elsewhere.
//! The file is optional.

mod models;
mod sources;
mod validation;

pub use crate::humanize::ByteSize;
pub use models::{AuditConfig, Config, CorsConfig, ImageConfig, ServerConfig};
pub use validation::{MAX_UPLOAD_LIMIT, ValidationError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
