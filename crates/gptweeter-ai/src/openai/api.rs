//! ChatBackend trait implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::http::{check_status, read_json, send_error};
use crate::{AiError, AiResponse, ChatBackend, GenerationParams, Message};

use super::client::OpenAiClient;

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<AiResponse, AiError> {
        let body = self.build_request_body(model, messages, params);

        debug!(model, messages = messages.len(), "chat completions request");

        let response = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(send_error)?;

        let json = read_json(check_status(response).await?).await?;
        self.parse_response(json)
    }
}
