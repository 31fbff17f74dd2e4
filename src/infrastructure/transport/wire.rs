//! Provider wire schema shared by every transport

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::{ChatRequest, ChatRole, Choice, DomainError, ProviderResponse, Usage};

/// JSON body of a chat-completion call
#[derive(Debug, Serialize)]
pub struct WireChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "no_stop_sequences")]
    stop: &'a BTreeSet<String>,
}

impl<'a> WireChatRequest<'a> {
    pub fn from_domain(request: &'a ChatRequest) -> Self {
        Self {
            messages: request
                .messages()
                .iter()
                .map(|m| WireMessage {
                    role: m.role().as_str(),
                    content: m.content(),
                })
                .collect(),
            max_tokens: request.max_tokens(),
            temperature: request.temperature(),
            frequency_penalty: request.frequency_penalty(),
            presence_penalty: request.presence_penalty(),
            top_p: request.top_p(),
            stop: request.stop_sequences(),
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::internal(format!("Failed to serialize request: {}", e)))
    }
}

fn no_stop_sequences(stop: &&BTreeSet<String>) -> bool {
    stop.is_empty()
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct WireChatResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    #[serde(default)]
    index: u32,
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    #[serde(default)]
    role: Option<ChatRole>,
    // null when the choice was content-filtered
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: Option<u32>,
}

impl WireUsage {
    fn into_domain(self) -> Usage {
        let usage = Usage::new(self.prompt_tokens, self.completion_tokens);
        match self.total_tokens {
            Some(total) => usage.with_total_tokens(total),
            None => usage,
        }
    }
}

impl WireChatResponse {
    pub fn into_domain(self) -> ProviderResponse {
        let choices = self
            .choices
            .into_iter()
            .map(|c| {
                Choice::new(
                    c.index,
                    c.message.role.unwrap_or(ChatRole::Assistant),
                    c.message.content.unwrap_or_default(),
                )
            })
            .collect();

        ProviderResponse {
            id: self.id,
            model: self.model,
            choices,
            usage: self.usage.map(WireUsage::into_domain),
        }
    }
}

/// Decode a provider JSON body into the domain response
pub fn parse_response(json: serde_json::Value) -> Result<ProviderResponse, DomainError> {
    let response: WireChatResponse = serde_json::from_value(json)
        .map_err(|e| DomainError::decode(format!("unexpected response shape: {}", e)))?;

    Ok(response.into_domain())
}
