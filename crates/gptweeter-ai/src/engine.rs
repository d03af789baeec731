//! Entry point for chat: resolves a model id to its budget and provider,
//! then hands out sessions bound to that provider.
//!
//! Provider clients are built once from the loaded credentials. A provider
//! without a key is left out; asking for one of its models fails with
//! [`AiError::Configuration`] naming where the key should come from.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use gptweeter_config::{Credentials, GptweeterConfig, ModelEntry, ProviderKind, Service};
use tracing::{debug, info};

use crate::models::ModelRegistry;
use crate::providers::ChatProvider;
use crate::retry::RetryPolicy;
use crate::session::Session;
use crate::tokens::TokenCounter;
use crate::{AiError, ChatBackend, Message};

const ALL_PROVIDERS: [ProviderKind; 3] = [
    ProviderKind::OpenAi,
    ProviderKind::Groq,
    ProviderKind::Anthropic,
];

pub struct ChatEngine {
    registry: ModelRegistry,
    backends: HashMap<ProviderKind, Arc<dyn ChatBackend>>,
    counter: TokenCounter,
    retry: RetryPolicy,
    default_model: String,
}

impl ChatEngine {
    /// An engine with no provider backends registered.
    pub fn new(
        registry: ModelRegistry,
        retry: RetryPolicy,
        default_model: impl Into<String>,
    ) -> Result<Self, AiError> {
        Ok(Self {
            registry,
            backends: HashMap::new(),
            counter: TokenCounter::new()?,
            retry,
            default_model: default_model.into(),
        })
    }

    /// Build the model table, retry policy and every provider client whose
    /// key is present.
    pub fn from_config(
        config: &GptweeterConfig,
        credentials: &Credentials,
    ) -> Result<Self, AiError> {
        let mut engine = Self::new(
            ModelRegistry::from_config(config),
            RetryPolicy::from_config(&config.chat),
            config.chat.default_model.clone(),
        )?;

        let timeout = Duration::from_secs(config.chat.request_timeout_secs);
        for kind in ALL_PROVIDERS {
            if credentials.get(Service::from(kind)).is_none() {
                debug!(provider = %kind, "no credentials, provider disabled");
                continue;
            }
            let provider = ChatProvider::build(kind, credentials, &config.endpoints, timeout)?;
            engine = engine.with_backend(kind, Arc::new(provider));
        }

        info!(
            providers = ?engine.providers(),
            default_model = %engine.default_model,
            "chat engine ready"
        );
        Ok(engine)
    }

    /// Register (or replace) the backend serving `kind`.
    pub fn with_backend(mut self, kind: ProviderKind, backend: Arc<dyn ChatBackend>) -> Self {
        self.backends.insert(kind, backend);
        self
    }

    /// Start a session for `model`, or the default model when `None`.
    pub fn create_session(
        &self,
        system_prompt: impl Into<String>,
        model: Option<&str>,
    ) -> Result<Session, AiError> {
        let (entry, backend) = self.resolve(model)?;
        let session = Session::new(
            entry,
            system_prompt,
            backend,
            self.counter.clone(),
            self.retry,
        );
        info!(session = %session.id(), model = %entry.id, "session created");
        Ok(session)
    }

    /// Rebuild a session from an exported transcript.
    pub fn restore_session(
        &self,
        transcript: Vec<Message>,
        model: Option<&str>,
    ) -> Result<Session, AiError> {
        let (entry, backend) = self.resolve(model)?;
        let session = Session::restore(
            entry,
            transcript,
            backend,
            self.counter.clone(),
            self.retry,
        )?;
        info!(
            session = %session.id(),
            model = %entry.id,
            turns = session.message_count(),
            "session restored"
        );
        Ok(session)
    }

    fn resolve(&self, model: Option<&str>) -> Result<(&ModelEntry, Arc<dyn ChatBackend>), AiError> {
        let entry = self.registry.get(model.unwrap_or(self.default_model.as_str()))?;
        let backend = self.backends.get(&entry.provider).cloned().ok_or_else(|| {
            let service = Service::from(entry.provider);
            AiError::Configuration(format!(
                "model '{}' needs the {} provider, but no API key was found: set {} or write it to ~/{}",
                entry.id,
                entry.provider,
                service.env_var(),
                service.key_file()
            ))
        })?;
        Ok((entry, backend))
    }

    /// Providers with a registered backend, in a stable order.
    pub fn providers(&self) -> Vec<ProviderKind> {
        ALL_PROVIDERS
            .into_iter()
            .filter(|k| self.backends.contains_key(k))
            .collect()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn counter(&self) -> &TokenCounter {
        &self.counter
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}
