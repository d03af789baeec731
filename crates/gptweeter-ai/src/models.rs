//! Model identifier lookup.

use std::collections::HashMap;

use gptweeter_config::schema::{builtin_models, merged_models, ModelEntry};
use gptweeter_config::GptweeterConfig;

use crate::AiError;

/// Read-only table mapping model ids to their budget and provider.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEntry>,
}

impl ModelRegistry {
    pub fn new(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        Self {
            models: entries.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    /// The built-in table only.
    pub fn builtin() -> Self {
        Self::new(builtin_models())
    }

    /// Built-in table plus the `[[models]]` entries of the config.
    pub fn from_config(config: &GptweeterConfig) -> Self {
        Self::new(merged_models(&config.models))
    }

    pub fn get(&self, id: &str) -> Result<&ModelEntry, AiError> {
        self.models
            .get(id)
            .ok_or_else(|| AiError::Configuration(format!("unknown model identifier '{id}'")))
    }

    /// All known ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.models.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptweeter_config::ProviderKind;

    #[test]
    fn builtin_lookup() {
        let registry = ModelRegistry::builtin();
        let mixtral = registry.get("mixtral-8x7b-32768").unwrap();
        assert_eq!(mixtral.provider, ProviderKind::Groq);
        assert_eq!(mixtral.max_tokens, 12_000);
    }

    #[test]
    fn unknown_model_is_configuration_error() {
        let registry = ModelRegistry::builtin();
        let err = registry.get("gpt-17").unwrap_err();
        assert!(matches!(err, AiError::Configuration(_)));
        assert!(err.to_string().contains("gpt-17"));
    }

    #[test]
    fn config_entries_extend_the_table() {
        let mut config = GptweeterConfig::default();
        config
            .models
            .push(ModelEntry::new("llama3-70b-8192", ProviderKind::Groq, 8000));
        let registry = ModelRegistry::from_config(&config);
        assert_eq!(registry.get("llama3-70b-8192").unwrap().max_tokens, 8000);
        assert!(registry.ids().contains(&"gpt-4-turbo-preview"));
    }
}
