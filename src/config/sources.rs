use super::ConfigError;
use super::models::Config;
use config::{Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "QUESTBOT_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/questbot.toml";
const ENV_PREFIX: &str = "QUESTBOT";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. Config file (required)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    if !config_path.is_file() {
        return Err(ConfigError::NotFound(config_path));
    }

    // Format is inferred from the extension (toml, json, yaml, ...)
    let builder = config::Config::builder()
        .add_source(File::from(config_path.clone()).required(true))
        // QUESTBOT__API__BASE_URL -> api.base_url
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true),
        );

    let mut config: Config = builder.build()?.try_deserialize()?;
    config.base_dir = config_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.to_path_buf());
    config.source = Some(config_path);

    Ok(config)
}
