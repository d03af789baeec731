//! Full configuration validation.
//!
//! Validates numeric ranges, the model table and endpoint URLs. Each
//! section has its own submodule; this orchestrator calls them all and
//! collects errors into a single `ConfigError`.

mod chat;
mod helpers;
mod images;


use crate::schema::GptweeterConfig;
use gptweeter_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GptweeterConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    chat::validate_chat(&mut errors, config);
    chat::validate_models(&mut errors, config);
    chat::validate_endpoints(&mut errors, config);
    images::validate_images(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
