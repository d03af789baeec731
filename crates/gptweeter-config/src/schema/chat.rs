//! Chat session settings.

use serde::{Deserialize, Serialize};

/// Chat completion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Model used when a caller does not pick one.
    pub default_model: String,
    /// Total attempts per completion, first try included (valid range: 1-10).
    pub retry_attempts: u32,
    /// Fixed delay between attempts in milliseconds (valid range: 0-60000).
    pub retry_delay_ms: u64,
    /// Per-request HTTP timeout in seconds (valid range: 5-600).
    pub request_timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: "gpt-4-turbo-preview".to_string(),
            retry_attempts: 5,
            retry_delay_ms: 2000,
            request_timeout_secs: 120,
        }
    }
}
