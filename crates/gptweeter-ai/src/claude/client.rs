//! Claude API client struct, request building, and response parsing.

use crate::http::build_client;
use crate::{AiError, AiResponse, GenerationParams, Message, Role, TokenUsage};

use super::config::ClaudeConfig;

pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API client.
pub struct ClaudeClient {
    pub(crate) config: ClaudeConfig,
    pub(crate) http: reqwest::Client,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Result<Self, AiError> {
        let http = build_client(config.timeout)?;
        Ok(Self { config, http })
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body for the Messages API.
    pub(crate) fn build_request_body(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> serde_json::Value {
        let msgs: Vec<_> = messages
            .iter()
            .filter(|m| m.role != Role::System)
            // The Messages API requires the first turn to come from the user.
            .skip_while(|m| m.role != Role::User)
            .map(|m| {
                serde_json::json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": model,
            "max_tokens": params.max_tokens.unwrap_or(self.config.max_tokens),
            "messages": msgs,
        });

        if let Some(system) = messages.iter().find(|m| m.role == Role::System) {
            body["system"] = serde_json::json!(system.content);
        }

        if let Some(temperature) = params.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    /// Parse a non-streaming response, joining all text blocks.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let blocks = json["content"]
            .as_array()
            .ok_or_else(|| AiError::ParseError("no content blocks in response".into()))?;

        let content = blocks
            .iter()
            .filter(|b| b["type"] == "text")
            .filter_map(|b| b["text"].as_str())
            .collect::<String>();

        let usage = TokenUsage {
            input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
        };

        Ok(AiResponse { content, usage })
    }
}
