//! Non-blocking transport over a shared connection pool

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::endpoint_url;
use super::http_client::HttpClientTrait;
use super::wire::{parse_response, WireChatRequest};
use crate::domain::{ChatRequest, DomainError, GatewayConfig, ProviderResponse, Transport};

/// POSTs to `{base_url}/{endpoint}` on a shared async client.
///
/// The call only suspends the calling task. Dropping the future aborts the
/// request and returns its connection to the pool.
#[derive(Debug)]
pub struct ReactiveTransport<C: HttpClientTrait> {
    http: Arc<C>,
}

impl<C: HttpClientTrait> ReactiveTransport<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<C: HttpClientTrait + 'static> Transport for ReactiveTransport<C> {
    async fn send(
        &self,
        request: ChatRequest,
        config: &GatewayConfig,
    ) -> Result<ProviderResponse, DomainError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| DomainError::configuration("gateway.endpoint is not set"))?;

        let url = endpoint_url(&config.base_url, endpoint, &config.api_version)?;
        let body = WireChatRequest::from_domain(&request).to_value()?;

        debug!(method = "POST", url = %url, "Dispatching reactive request");

        let headers = vec![
            ("Content-Type", "application/json"),
            ("api-key", config.api_key.as_str()),
        ];

        let json = self.http.post_json(url.as_str(), headers, &body).await?;
        parse_response(json)
    }

    fn name(&self) -> &'static str {
        "reactive"
    }
}
