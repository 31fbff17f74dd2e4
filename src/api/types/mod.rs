//! Wire types of the HTTP API

pub mod error;
pub mod json;
pub mod prompt;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use prompt::{AmaChoice, AmaMessage, AmaResponse, BotResponse, PromptRequest};
