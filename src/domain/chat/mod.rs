//! Chat request/response model, request assembly and normalization

mod builder;
mod message;
pub mod normalizer;
mod request;
mod response;

pub use builder::{truncate_to_char_budget, RequestBuilder, TokenSource, EMPTY_PROMPT_MESSAGE};
pub use message::{ChatMessage, ChatRole};
pub use normalizer::Answers;
pub use request::{ChatRequest, SamplingParams};
pub use response::{Choice, ProviderResponse, Usage};

#[cfg(test)]
pub use builder::MockTokenSource;
