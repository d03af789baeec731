//! Anthropic Claude API client.
//!
//! Implements the `ChatBackend` trait for Claude models via the
//! Anthropic Messages API (`{base_url}/messages`). The system turn is
//! carried in the top-level `system` field rather than the message list.

mod api;
mod client;
mod config;

pub use client::ClaudeClient;
pub use config::ClaudeConfig;
