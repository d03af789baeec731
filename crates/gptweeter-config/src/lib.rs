//! GPTweeter configuration system.
//!
//! Provides TOML-based settings for chat models, image generation and
//! provider endpoints, plus API credential loading. All config sections use
//! sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use gptweeter_config::{load_config, config_to_json, Credentials};
//!
//! let config = load_config().expect("failed to load config");
//! let credentials = Credentials::load();
//! println!("{}", config_to_json(&config));
//! println!("providers: {:?}", credentials.available());
//! ```

pub mod credentials;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use credentials::{ApiKey, Credentials, Service};
pub use schema::{
    GptweeterConfig, ImageBackendKind, ImageSize, ModelEntry, ProviderKind,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use gptweeter_common::ConfigError;

/// Convenience function to load config from the platform default path.
///
/// Loads `config.toml` from the OS config directory, creates a default
/// if none exists, and validates the result.
pub fn load_config() -> Result<GptweeterConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path, falling back to the default location.
pub fn load_config_from(path: Option<&Path>) -> Result<GptweeterConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &GptweeterConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
