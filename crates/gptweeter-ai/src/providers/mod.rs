//! The closed set of chat provider families.
//!
//! A model id resolves to a [`ProviderKind`] when the model table is built;
//! the matching [`ChatProvider`] variant is constructed once from the
//! loaded credentials and shared by every session using that family.

use std::time::Duration;

use async_trait::async_trait;
use gptweeter_config::schema::EndpointsConfig;
use gptweeter_config::{Credentials, ProviderKind, Service};

use crate::claude::{ClaudeClient, ClaudeConfig};
use crate::openai::{OpenAiClient, OpenAiConfig};
use crate::{AiError, AiResponse, ChatBackend, GenerationParams, Message};

pub enum ChatProvider {
    OpenAi(OpenAiClient),
    Groq(OpenAiClient),
    Anthropic(ClaudeClient),
}

impl ChatProvider {
    /// Build the client for `kind`, failing if its API key was not loaded.
    pub fn build(
        kind: ProviderKind,
        credentials: &Credentials,
        endpoints: &EndpointsConfig,
        timeout: Duration,
    ) -> Result<Self, AiError> {
        let key = credentials.require(Service::from(kind))?.expose();
        let provider = match kind {
            ProviderKind::OpenAi => ChatProvider::OpenAi(OpenAiClient::new(
                OpenAiConfig::new(key, &endpoints.openai).with_timeout(timeout),
            )?),
            ProviderKind::Groq => ChatProvider::Groq(OpenAiClient::new(
                OpenAiConfig::new(key, &endpoints.groq).with_timeout(timeout),
            )?),
            ProviderKind::Anthropic => ChatProvider::Anthropic(ClaudeClient::new(
                ClaudeConfig::new(key, &endpoints.anthropic).with_timeout(timeout),
            )?),
        };
        Ok(provider)
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ChatProvider::OpenAi(_) => ProviderKind::OpenAi,
            ChatProvider::Groq(_) => ProviderKind::Groq,
            ChatProvider::Anthropic(_) => ProviderKind::Anthropic,
        }
    }
}

#[async_trait]
impl ChatBackend for ChatProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> Result<AiResponse, AiError> {
        match self {
            ChatProvider::OpenAi(client) | ChatProvider::Groq(client) => {
                client.complete(model, messages, params).await
            }
            ChatProvider::Anthropic(client) => client.complete(model, messages, params).await,
        }
    }
}
