//! Gateway configuration, transport seam and orchestration

mod config;
mod pipeline;
mod transport;

pub use config::{GatewayConfig, TransportKind};
pub use pipeline::{
    Answer, Completion, Gateway, GatewayFailure, GatewayResult, GatewayStage, ANSWER_SEPARATOR,
};
pub use transport::Transport;

#[cfg(test)]
pub use transport::MockTransport;
