//! Turns a raw user prompt into a provider-ready [`ChatRequest`]

use std::collections::BTreeSet;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use super::{ChatMessage, ChatRequest};
use crate::domain::gateway::GatewayConfig;
use crate::domain::DomainError;

/// Message returned to callers that send an empty or missing prompt
pub const EMPTY_PROMPT_MESSAGE: &str = "User prompt cannot be empty";

/// Source of opaque, high-entropy tokens used to make prompts unique.
///
/// Uniqueness only; implementations need not be cryptographically secure.
#[cfg_attr(test, automock)]
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// Cut `text` down to at most `budget` characters, dropping the tail.
///
/// This is a character count standing in for the provider's token budget.
/// It does not guarantee the provider's tokenizer agrees.
pub fn truncate_to_char_budget(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// Assembles chat requests: system preamble first, then the user prompt
#[derive(Clone, Default)]
pub struct RequestBuilder {
    token_source: Option<Arc<dyn TokenSource>>,
}

impl RequestBuilder {
    /// Builder that forwards prompts as-is (still truncated)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that prefixes every prompt with a fresh token from `source`
    pub fn with_cache_busting(source: Arc<dyn TokenSource>) -> Self {
        Self {
            token_source: Some(source),
        }
    }

    pub fn is_cache_busting(&self) -> bool {
        self.token_source.is_some()
    }

    pub fn build(
        &self,
        config: &GatewayConfig,
        prompt: Option<&str>,
    ) -> Result<ChatRequest, DomainError> {
        self.build_with_stop(config, prompt, config.stop.clone())
    }

    /// Same as [`build`](Self::build) with caller-supplied stop sequences
    pub fn build_with_stop(
        &self,
        config: &GatewayConfig,
        prompt: Option<&str>,
        stop: BTreeSet<String>,
    ) -> Result<ChatRequest, DomainError> {
        let prompt = match prompt {
            Some(p) if !p.is_empty() => p,
            _ => return Err(DomainError::invalid_input(EMPTY_PROMPT_MESSAGE)),
        };

        let user_content = self.user_content(prompt, config.max_token_length);

        let mut sampling = config.sampling();
        sampling.stop = stop;

        ChatRequest::new(
            vec![
                ChatMessage::system(config.system_preamble.as_str()),
                ChatMessage::user(user_content),
            ],
            sampling,
        )
    }

    fn user_content(&self, prompt: &str, budget: usize) -> String {
        match &self.token_source {
            Some(source) => {
                let prefixed = format!("{}\n{}", source.next_token(), prompt);
                truncate_to_char_budget(&prefixed, budget)
            }
            None => truncate_to_char_budget(prompt, budget),
        }
    }
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("cache_busting", &self.is_cache_busting())
            .finish()
    }
}
