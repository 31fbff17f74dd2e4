//! Prompt endpoint handlers: `/prompt`, `/chat` and `/ama`
//!
//! All three run the same gateway invocation and differ only in how they
//! render it. An empty or missing prompt is answered with 200 and the
//! rejection message; the upstream is never contacted for it.

use axum::extract::State;
use tracing::{debug, info};

use crate::api::middleware::truncate_for_log;
use crate::api::state::AppState;
use crate::api::types::{AmaResponse, ApiError, BotResponse, Json, PromptRequest};
use crate::domain::{Completion, DomainError};

const PROMPT_LOG_CHARS: usize = 200;

/// A prompt either reaches the provider or is turned away locally
enum Outcome {
    Answered(Completion),
    Rejected(String),
}

async fn run(
    state: &AppState,
    endpoint: &'static str,
    request: &PromptRequest,
) -> Result<Outcome, ApiError> {
    let prompt = request.prompt.as_deref();

    info!(
        endpoint,
        prompt_chars = prompt.map(|p| p.chars().count()),
        "Processing prompt"
    );

    if let Some(p) = prompt {
        debug!(endpoint, prompt = %truncate_for_log(p, PROMPT_LOG_CHARS), "Prompt text");
    }

    match state.gateway.complete(prompt).await {
        Ok(completion) => Ok(Outcome::Answered(completion)),
        Err(failure) => match failure.into_error() {
            DomainError::InvalidInput { message } => Ok(Outcome::Rejected(message)),
            other => Err(ApiError::from(other)),
        },
    }
}

/// POST /prompt
///
/// Replies with the answers as `text/plain`, one per line.
pub async fn prompt(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<String, ApiError> {
    match run(&state, "prompt", &request).await? {
        Outcome::Answered(completion) => Ok(completion.joined_text()),
        Outcome::Rejected(message) => Ok(message),
    }
}

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<BotResponse>, ApiError> {
    let response = match run(&state, "chat", &request).await? {
        Outcome::Answered(completion) => BotResponse::new(completion.joined_text()),
        Outcome::Rejected(message) => BotResponse::new(message),
    };

    Ok(Json(response))
}

/// POST /ama
///
/// Replies with every choice and its metadata instead of the joined text,
/// along with the provider's token usage when it sent one.
pub async fn ama(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<AmaResponse>, ApiError> {
    let response = match run(&state, "ama", &request).await? {
        Outcome::Answered(completion) => AmaResponse::from(completion),
        Outcome::Rejected(message) => AmaResponse::single(message),
    };

    Ok(Json(response))
}
