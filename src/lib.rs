//! Prompt Gateway
//!
//! Forwards user prompts to an Azure-OpenAI-style chat-completion API and
//! returns the answers as text, JSON or the full choice list. Three
//! interchangeable transports sit behind one orchestration pipeline:
//! - `sdk`: typed client keyed by deployment name
//! - `reactive`: shared non-blocking connection pool
//! - `blocking`: per-call blocking client with custom headers

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::{DomainError, Gateway, GatewayConfig};
use infrastructure::{RandomTokenSource, TransportFactory};
use tracing::info;

/// Validate `config` and wire the configured transport into a gateway
pub fn create_gateway(config: GatewayConfig) -> Result<Gateway, DomainError> {
    let transport = TransportFactory::create(&config)?;

    info!(
        transport = transport.name(),
        base_url = %config.base_url,
        cache_busting = config.cache_busting,
        max_token_length = config.max_token_length,
        "Gateway configured"
    );

    Ok(Gateway::new(
        Arc::new(config),
        transport,
        Arc::new(RandomTokenSource::new()),
    ))
}

/// Create the application state from the loaded configuration
pub fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    config.server.validate()?;
    let gateway = create_gateway(config.gateway.clone())?;
    Ok(AppState::new(Arc::new(gateway)))
}
