//! Token accounting for transcripts.
//!
//! Counts follow the chat-completions convention: every message costs a
//! fixed overhead plus the encoded length of each field, and the reply is
//! primed with a couple more tokens. The numbers are meant for conservative
//! budget checks, not exact billing.

use std::fmt;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;

use crate::{AiError, Message};

/// `<im_start>{role}\n{content}<im_end>\n` framing per message.
pub const TOKENS_PER_MESSAGE: usize = 4;
/// Every reply is primed with `<im_start>assistant`.
pub const REPLY_PRIMING_TOKENS: usize = 2;

/// `cl100k_base` tokenizer shared by every session created from one engine.
#[derive(Clone)]
pub struct TokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    pub fn new() -> Result<Self, AiError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| AiError::Configuration(format!("failed to load tokenizer: {e}")))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    pub fn num_tokens_from_text(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    pub fn num_tokens_from_messages(&self, messages: &[Message]) -> usize {
        let body: usize = messages
            .iter()
            .map(|m| {
                TOKENS_PER_MESSAGE
                    + self.num_tokens_from_text(m.role.as_str())
                    + self.num_tokens_from_text(&m.content)
            })
            .sum();
        body + REPLY_PRIMING_TOKENS
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}
