//! Domain layer - Core business logic and entities

pub mod chat;
pub mod error;
pub mod gateway;

pub use chat::{
    ChatMessage, ChatRequest, ChatRole, Choice, ProviderResponse, RequestBuilder, SamplingParams,
    TokenSource, Usage, EMPTY_PROMPT_MESSAGE,
};
pub use error::{DomainError, ErrorKind, TransportError};
pub use gateway::{
    Answer, Completion, Gateway, GatewayConfig, GatewayFailure, GatewayResult, GatewayStage,
    Transport, TransportKind,
};
