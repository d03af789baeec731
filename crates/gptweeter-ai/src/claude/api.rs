//! ChatBackend trait implementation for ClaudeClient.

use async_trait::async_trait;
use tracing::debug;

use crate::http::{check_status, read_json, send_error};
use crate::{AiError, AiResponse, ChatBackend, GenerationParams, Message};

use super::client::{ClaudeClient, ANTHROPIC_VERSION};

#[async_trait]
impl ChatBackend for ClaudeClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(model, messages, params);

        debug!(model, messages = messages.len(), "Claude API request");

        let response = self
            .http
            .post(self.api_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        let json = read_json(check_status(response).await?).await?;
        self.parse_response(json)
    }
}
