//! OpenAI-compatible chat completions client.
//!
//! Implements the `ChatBackend` trait against `{base_url}/chat/completions`.
//! OpenAI and Groq share this wire shape and differ only in base URL and
//! API key.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
