//! Provider-reported token usage for one session.

use std::collections::HashMap;

use gptweeter_config::ProviderKind;

use crate::TokenUsage;

/// Cumulative usage reported back by providers, per provider family.
#[derive(Debug, Clone, Default)]
pub struct TokenTracker {
    total: TokenUsage,
    by_provider: HashMap<ProviderKind, TokenUsage>,
    call_count: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a completed call.
    pub fn record(&mut self, provider: ProviderKind, usage: &TokenUsage) {
        self.total.input_tokens += usage.input_tokens;
        self.total.output_tokens += usage.output_tokens;
        self.call_count += 1;

        let entry = self.by_provider.entry(provider).or_default();
        entry.input_tokens += usage.input_tokens;
        entry.output_tokens += usage.output_tokens;
    }

    pub fn total(&self) -> &TokenUsage {
        &self.total
    }

    pub fn for_provider(&self, provider: ProviderKind) -> Option<&TokenUsage> {
        self.by_provider.get(&provider)
    }

    pub fn total_tokens(&self) -> u64 {
        self.total.total_tokens()
    }

    /// Number of successful completions recorded.
    pub fn call_count(&self) -> u64 {
        self.call_count
    }
}
