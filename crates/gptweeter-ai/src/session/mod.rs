//! Conversation session management.
//!
//! A `Session` owns one transcript whose first turn is the system prompt,
//! keeps it inside the model's token budget, and sends it to the model's
//! provider under the retry policy.

mod chat;
mod manager;
mod types;

#[cfg(test)]
mod tests;

pub use manager::Session;
pub use types::SendOptions;
