//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::GuidmapConfig;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "guidmap.toml";

/// Loads `<dir>/guidmap.toml`, or the defaults if that file does not exist.
pub fn load_config(dir: &Path) -> Result<GuidmapConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(GuidmapConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates an explicitly named configuration file.
///
/// Unlike [`load_config`], a missing file is an error.
pub fn load_config_file(path: &Path) -> Result<GuidmapConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `guidmap.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<GuidmapConfig, ConfigError> {
    let config: GuidmapConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &GuidmapConfig) -> Result<(), ConfigError> {
    if config.cache.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "cache.path must not be empty".to_string(),
        ));
    }
    Ok(())
}
