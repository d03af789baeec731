//! Core TOML config loading: read from path or platform default.

use crate::schema::GptweeterConfig;
use gptweeter_common::ConfigError;
use std::path::Path;
use tracing::info;

use super::paths::{create_default_config, default_config_path};

/// Load config from a specific TOML file path.
///
/// Deserializes the file using serde defaults for any missing fields.
/// No validation happens here; callers go through `load_config_from`.
pub fn load_from_path(path: &Path) -> Result<GptweeterConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: GptweeterConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from `GPTWEETER_CONFIG` or the platform-specific default path.
///
/// On macOS: `~/Library/Application Support/gptweeter/config.toml`
/// On Linux: `~/.config/gptweeter/config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<GptweeterConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, creating default", path.display());
            create_default_config(&path)?;
            Ok(GptweeterConfig::default())
        }
        Err(e) => Err(e),
    }
}
