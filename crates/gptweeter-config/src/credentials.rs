//! Provider API credentials.
//!
//! Each provider's key is read once at startup from an environment
//! variable, falling back to a dotfile in the user's home directory. The
//! resulting [`Credentials`] value is passed by reference to whatever builds
//! provider clients; nothing here is global.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use gptweeter_common::ConfigError;
use tracing::{debug, warn};

use crate::schema::ProviderKind;

/// A provider that needs its own API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    OpenAi,
    Groq,
    Anthropic,
    Replicate,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::OpenAi,
        Service::Groq,
        Service::Anthropic,
        Service::Replicate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Service::OpenAi => "openai",
            Service::Groq => "groq",
            Service::Anthropic => "anthropic",
            Service::Replicate => "replicate",
        }
    }

    /// Environment variable checked first.
    pub fn env_var(self) -> &'static str {
        match self {
            Service::OpenAi => "OPENAI_KEY",
            Service::Groq => "GROQ_KEY",
            Service::Anthropic => "ANTHROPIC_API_KEY",
            Service::Replicate => "REPLICATE_API_TOKEN",
        }
    }

    /// Key file name, relative to the home directory.
    pub fn key_file(self) -> &'static str {
        match self {
            Service::OpenAi => ".openai_key",
            Service::Groq => ".groq_apikey",
            Service::Anthropic => ".anthropic_key",
            Service::Replicate => ".replicate_key",
        }
    }
}

impl From<ProviderKind> for Service {
    fn from(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::OpenAi => Service::OpenAi,
            ProviderKind::Groq => Service::Groq,
            ProviderKind::Anthropic => Service::Anthropic,
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Keys for every provider that has one configured.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: HashMap<Service, ApiKey>,
}

impl Credentials {
    /// Load keys from the process environment and the home directory.
    pub fn load() -> Self {
        Self::load_with(|name| std::env::var(name).ok(), dirs::home_dir().as_deref())
    }

    /// Load keys using an explicit environment lookup and home directory.
    pub fn load_with(env: impl Fn(&str) -> Option<String>, home: Option<&Path>) -> Self {
        let mut keys = HashMap::new();
        for service in Service::ALL {
            match resolve(service, &env, home) {
                Some(key) => {
                    keys.insert(service, key);
                }
                None => debug!(service = %service, "no API key found"),
            }
        }
        Self { keys }
    }

    pub fn with_key(mut self, service: Service, key: impl Into<String>) -> Self {
        self.keys.insert(service, ApiKey::new(key));
        self
    }

    pub fn get(&self, service: Service) -> Option<&ApiKey> {
        self.keys.get(&service)
    }

    /// The key for `service`, or an error naming where it should have come from.
    pub fn require(&self, service: Service) -> Result<&ApiKey, ConfigError> {
        self.get(service).ok_or_else(|| {
            ConfigError::CredentialError(format!(
                "{service} API key not found: set {} or write it to ~/{}",
                service.env_var(),
                service.key_file()
            ))
        })
    }

    /// Services with a key, in a stable order.
    pub fn available(&self) -> Vec<Service> {
        Service::ALL
            .into_iter()
            .filter(|s| self.keys.contains_key(s))
            .collect()
    }
}

fn resolve(
    service: Service,
    env: &impl Fn(&str) -> Option<String>,
    home: Option<&Path>,
) -> Option<ApiKey> {
    if let Some(value) = env(service.env_var()) {
        let value = value.trim();
        if !value.is_empty() {
            return Some(ApiKey::new(value));
        }
    }

    let path = home?.join(service.key_file());
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let value = contents.trim();
            (!value.is_empty()).then(|| ApiKey::new(value))
        }
        Err(e) => {
            warn!("failed to read {}: {e}", path.display());
            None
        }
    }
}
