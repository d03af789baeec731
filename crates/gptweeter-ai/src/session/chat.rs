//! Async completion methods for Session.

use std::time::Instant;

use gptweeter_common::new_correlation_id;
use tracing::{debug, error, info};

use crate::{AiError, Message};

use super::manager::Session;
use super::types::SendOptions;

impl Session {
    /// Trim, append `text` (if any), and ask the provider for the next turn.
    ///
    /// Trimming runs before the append, so the newest turn always reaches the
    /// provider even when it alone exceeds the budget. It is evicted by a
    /// later send.
    ///
    /// Returns `Ok(None)` without contacting the provider when
    /// `options.no_response` is set. A reply is appended as an assistant
    /// turn before it is returned.
    pub async fn send(
        &mut self,
        text: Option<String>,
        options: SendOptions,
    ) -> Result<Option<String>, AiError> {
        self.trim();
        if let Some(text) = text {
            self.messages.push(Message::new(options.role, text));
        }

        if options.no_response {
            return Ok(None);
        }

        let correlation_id = new_correlation_id();
        info!(
            session = %self.id.short(),
            correlation_id = %correlation_id,
            model = %self.model,
            provider = %self.provider,
            messages = self.messages.len(),
            tokens = self.token_count(),
            "requesting chat completion"
        );

        let started = Instant::now();
        let backend = self.backend.as_ref();
        let model = self.model.as_str();
        let messages = self.messages.as_slice();
        let params = &options.params;
        let cid = correlation_id.as_str();

        let result = self
            .retry
            .run(move |attempt| {
                debug!(correlation_id = %cid, attempt, "calling provider");
                backend.complete(model, messages, params)
            })
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(
                    session = %self.id.short(),
                    correlation_id = %correlation_id,
                    error = %e,
                    "chat completion failed"
                );
                return Err(e);
            }
        };

        info!(
            session = %self.id.short(),
            correlation_id = %correlation_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "received chat completion"
        );

        self.tracker.record(self.provider, &response.usage);
        self.messages.push(Message::assistant(response.content.clone()));
        Ok(Some(response.content))
    }

    /// Send a user turn and return the reply.
    pub async fn chat(&mut self, text: impl Into<String>) -> Result<String, AiError> {
        let reply = self.send(Some(text.into()), SendOptions::default()).await?;
        Ok(reply.unwrap_or_default())
    }
}
