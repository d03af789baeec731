//! Validation for chat settings, the model table and endpoints.

use std::collections::HashSet;

use crate::schema::{merged_models, GptweeterConfig};

use super::helpers::{validate_http_url, validate_range};

/// Validate chat retry and timeout constraints.
pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &GptweeterConfig) {
    validate_range(errors, "chat.retry_attempts", config.chat.retry_attempts, 1, 10);
    validate_range(errors, "chat.retry_delay_ms", config.chat.retry_delay_ms, 0, 60_000);
    validate_range(
        errors,
        "chat.request_timeout_secs",
        config.chat.request_timeout_secs,
        5,
        600,
    );
}

/// Validate configured models and that the default model exists.
pub(crate) fn validate_models(errors: &mut Vec<String>, config: &GptweeterConfig) {
    let mut seen = HashSet::new();
    for entry in &config.models {
        if entry.id.trim().is_empty() {
            errors.push("models: entry with empty id".to_string());
        }
        if !seen.insert(entry.id.as_str()) {
            errors.push(format!("models: duplicate id '{}'", entry.id));
        }
        if entry.max_tokens == 0 {
            errors.push(format!("models.{}.max_tokens must be greater than 0", entry.id));
        }
    }

    let known = merged_models(&config.models);
    if !known.iter().any(|m| m.id == config.chat.default_model) {
        errors.push(format!(
            "chat.default_model = '{}' is not a known model",
            config.chat.default_model
        ));
    }
}

/// Validate provider base URLs.
pub(crate) fn validate_endpoints(errors: &mut Vec<String>, config: &GptweeterConfig) {
    validate_http_url(errors, "endpoints.openai", &config.endpoints.openai);
    validate_http_url(errors, "endpoints.groq", &config.endpoints.groq);
    validate_http_url(errors, "endpoints.anthropic", &config.endpoints.anthropic);
    validate_http_url(errors, "endpoints.replicate", &config.endpoints.replicate);
}
