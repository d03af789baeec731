//! Chat model table entries.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which text-generation provider family serves a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Groq,
    Anthropic,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the model table: identifier, token budget and provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub provider: ProviderKind,
    /// Maximum transcript size in tokenizer units.
    pub max_tokens: usize,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>, provider: ProviderKind, max_tokens: usize) -> Self {
        Self {
            id: id.into(),
            provider,
            max_tokens,
        }
    }
}

/// The model table the service ships with. Budgets are deliberately far
/// below the providers' real context windows.
pub fn builtin_models() -> Vec<ModelEntry> {
    vec![
        ModelEntry::new("gpt-3.5-turbo", ProviderKind::OpenAi, 12_000),
        ModelEntry::new("gpt-4-turbo-preview", ProviderKind::OpenAi, 12_000),
        ModelEntry::new("mixtral-8x7b-32768", ProviderKind::Groq, 12_000),
        ModelEntry::new("claude-3-haiku-20240307", ProviderKind::Anthropic, 12_000),
    ]
}

/// Built-in entries overlaid with configured ones; a configured id replaces
/// the built-in entry of the same id.
pub fn merged_models(extra: &[ModelEntry]) -> Vec<ModelEntry> {
    let mut models = builtin_models();
    for entry in extra {
        match models.iter_mut().find(|m| m.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => models.push(entry.clone()),
        }
    }
    models
}
