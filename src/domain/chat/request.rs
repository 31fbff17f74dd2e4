use std::collections::BTreeSet;

use super::{ChatMessage, ChatRole};
use crate::domain::DomainError;

/// Sampling parameters applied to a completion request
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub top_p: f32,
    pub stop: BTreeSet<String>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            top_p: 0.95,
            stop: BTreeSet::new(),
        }
    }
}

impl SamplingParams {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_tokens == 0 {
            return Err(DomainError::configuration("max_tokens must be greater than 0"));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::configuration(format!(
                "temperature must be within [0, 2], got {}",
                self.temperature
            )));
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(DomainError::configuration(format!(
                "top_p must be within [0, 1], got {}",
                self.top_p
            )));
        }

        Ok(())
    }
}

/// A complete chat-completion request.
///
/// Built once per prompt and never mutated afterwards. Holds at least one
/// message, and a system message, when present, comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
    sampling: SamplingParams,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, sampling: SamplingParams) -> Result<Self, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::internal("chat request needs at least one message"));
        }

        let misplaced_system = messages
            .iter()
            .skip(1)
            .any(|m| m.role() == ChatRole::System);

        if misplaced_system {
            return Err(DomainError::internal(
                "system message must precede all other messages",
            ));
        }

        sampling.validate()?;

        Ok(Self { messages, sampling })
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn max_tokens(&self) -> u32 {
        self.sampling.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.sampling.temperature
    }

    pub fn frequency_penalty(&self) -> f32 {
        self.sampling.frequency_penalty
    }

    pub fn presence_penalty(&self) -> f32 {
        self.sampling.presence_penalty
    }

    pub fn top_p(&self) -> f32 {
        self.sampling.top_p
    }

    pub fn stop_sequences(&self) -> &BTreeSet<String> {
        &self.sampling.stop
    }

    /// The last user message, if any
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == ChatRole::User)
            .map(ChatMessage::content)
    }
}
