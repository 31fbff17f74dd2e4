use serde::{Deserialize, Serialize};

use super::{ChatMessage, ChatRole};

/// Token usage statistics reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Usage with the total derived from the two counts, saturating at `u32::MAX`
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Replace the derived total with the one the provider reported
    pub fn with_total_tokens(mut self, total_tokens: u32) -> Self {
        self.total_tokens = total_tokens;
        self
    }
}

/// One candidate continuation returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
}

impl Choice {
    pub fn new(index: u32, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            index,
            message: ChatMessage::new(role, content),
        }
    }

    pub fn role(&self) -> ChatRole {
        self.message.role()
    }

    pub fn content(&self) -> &str {
        self.message.content()
    }
}

/// Transport-independent view of a chat-completion response.
///
/// `choices` keeps the provider's array order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    pub id: Option<String>,
    pub model: Option<String>,
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

impl ProviderResponse {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self {
            choices,
            ..Self::default()
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}
