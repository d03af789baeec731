//! Session struct and transcript management.

use std::sync::Arc;

use gptweeter_common::SessionId;
use gptweeter_config::{ModelEntry, ProviderKind};
use tracing::info;

use crate::retry::RetryPolicy;
use crate::token_tracker::TokenTracker;
use crate::tokens::TokenCounter;
use crate::{AiError, ChatBackend, Message, Role};

/// A conversation with one model, bounded by that model's token budget.
pub struct Session {
    pub(super) id: SessionId,
    pub(super) model: String,
    pub(super) provider: ProviderKind,
    pub(super) max_tokens: usize,
    /// Index 0 is always the system turn.
    pub(super) messages: Vec<Message>,
    pub(super) backend: Arc<dyn ChatBackend>,
    pub(super) counter: TokenCounter,
    pub(super) retry: RetryPolicy,
    pub(super) tracker: TokenTracker,
}

impl Session {
    /// Start a transcript holding only `system_prompt`.
    pub fn new(
        model: &ModelEntry,
        system_prompt: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
        counter: TokenCounter,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            id: SessionId::new(),
            model: model.id.clone(),
            provider: model.provider,
            max_tokens: model.max_tokens,
            messages: vec![Message::system(system_prompt)],
            backend,
            counter,
            retry,
            tracker: TokenTracker::new(),
        }
    }

    /// Rebuild a session from an exported transcript.
    ///
    /// The transcript is taken as-is; it is trimmed on the next send like
    /// any other.
    pub fn restore(
        model: &ModelEntry,
        transcript: Vec<Message>,
        backend: Arc<dyn ChatBackend>,
        counter: TokenCounter,
        retry: RetryPolicy,
    ) -> Result<Self, AiError> {
        match transcript.first() {
            None => {
                return Err(AiError::Configuration(
                    "cannot restore an empty transcript".into(),
                ))
            }
            Some(first) if first.role != Role::System => {
                return Err(AiError::Configuration(format!(
                    "transcript must start with a system turn, found {}",
                    first.role.as_str()
                )))
            }
            Some(_) => {}
        }

        let mut session = Self::new(model, String::new(), backend, counter, retry);
        session.messages = transcript;
        Ok(session)
    }

    /// Evict the oldest non-system turns until the transcript fits the
    /// budget or only the system turn is left. Returns how many were evicted.
    pub fn trim(&mut self) -> usize {
        let mut evicted = 0;
        let mut tokens = self.token_count();
        while self.messages.len() > 1 && tokens > self.max_tokens {
            let removed = self.messages.remove(1);
            evicted += 1;
            tokens = self.token_count();
            info!(
                session = %self.id.short(),
                role = removed.role.as_str(),
                tokens,
                max_tokens = self.max_tokens,
                "evicted oldest turn to fit token budget"
            );
        }
        evicted
    }

    pub fn token_count(&self) -> usize {
        self.counter.num_tokens_from_messages(&self.messages)
    }

    /// An owned copy of the transcript.
    pub fn export(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_prompt(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    /// Number of turns, system turn included.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
