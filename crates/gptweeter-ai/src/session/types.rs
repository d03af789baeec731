//! Per-request options for [`Session::send`](super::Session::send).

use crate::{GenerationParams, Role};

#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Role of the appended turn.
    pub role: Role,
    /// Append and trim only; no provider call is made.
    pub no_response: bool,
    pub params: GenerationParams,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            role: Role::User,
            no_response: false,
            params: GenerationParams::default(),
        }
    }
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Prime the transcript without asking for a reply.
    pub fn no_response(mut self) -> Self {
        self.no_response = true;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.params.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.params.max_tokens = Some(max_tokens);
        self
    }
}
