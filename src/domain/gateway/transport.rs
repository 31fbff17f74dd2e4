use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::GatewayConfig;
use crate::domain::chat::{ChatRequest, ProviderResponse};
use crate::domain::DomainError;

/// Sends one chat request upstream and returns the provider's response.
///
/// Implementations must map non-success statuses to
/// [`TransportError::Status`](crate::domain::TransportError::Status) and
/// failed calls to [`TransportError::Network`](crate::domain::TransportError::Network).
/// Dropping the returned future abandons the upstream call.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: ChatRequest,
        config: &GatewayConfig,
    ) -> Result<ProviderResponse, DomainError>;

    /// Short name used in logs and health output
    fn name(&self) -> &'static str;
}
