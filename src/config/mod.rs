//! Configuration management for questbot
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. Configuration file (TOML or JSON, required)
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use questbot::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Processing up to {} accounts at once", config.concurrency);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `QUESTBOT__<section>__<key>`
//!
//! Examples:
//! - `QUESTBOT__CONCURRENCY=10`
//! - `QUESTBOT__API__BASE_URL=https://staging.example.com`
//! - `QUESTBOT__SCHEDULE__OVERLAP=allow`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/questbot.toml`.
//! This can be overridden using the `QUESTBOT_CONFIG` environment variable.
//! Unlike the environment layer, the file must exist.

mod models;
mod sources;
mod validation;

pub use models::{ApiConfig, Config, FilesConfig, LogConfig, OverlapPolicy, ScheduleConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`QUESTBOT__*`)
    /// 2. Config file (default: `config/questbot.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is missing or malformed
    /// - Validation fails (zero limits, inverted delay window, bad URL)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}
