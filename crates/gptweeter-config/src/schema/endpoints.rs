//! Provider base URLs.

use serde::{Deserialize, Serialize};

/// Base URLs for every provider. Overridable for proxies and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub openai: String,
    pub groq: String,
    pub anthropic: String,
    pub replicate: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com/v1".to_string(),
            groq: "https://api.groq.com/openai/v1".to_string(),
            anthropic: "https://api.anthropic.com/v1".to_string(),
            replicate: "https://api.replicate.com/v1".to_string(),
        }
    }
}
