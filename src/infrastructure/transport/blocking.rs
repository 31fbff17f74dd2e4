//! Blocking transport with custom headers, run on the blocking thread pool

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use super::{endpoint_url, error_body};
use super::wire::{parse_response, WireChatRequest};
use crate::domain::{ChatRequest, DomainError, GatewayConfig, ProviderResponse, Transport};

const API_KEY_HEADER: &str = "api-key";

/// Sends each request with a `reqwest::blocking` client built for that call.
///
/// The call occupies one blocking worker thread until it returns. If the
/// caller stops waiting, the thread still runs to completion or until the
/// client timeout (`upstream_timeout_secs`, reqwest's 30s default otherwise)
/// and then drops the client along with its connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingTransport;

impl BlockingTransport {
    pub fn new() -> Self {
        Self
    }
}

/// Everything the worker thread needs, owned
struct BlockingCall {
    url: String,
    headers: HeaderMap,
    body: serde_json::Value,
    timeout: Option<Duration>,
}

impl BlockingCall {
    fn execute(self) -> Result<serde_json::Value, DomainError> {
        let mut builder = reqwest::blocking::Client::builder().default_headers(self.headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            DomainError::configuration(format!("Failed to build blocking HTTP client: {}", e))
        })?;

        let response = client
            .post(&self.url)
            .json(&self.body)
            .send()
            .map_err(|e| DomainError::network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let body = error_body(response.text());
            return Err(DomainError::upstream_status(status.as_u16(), body));
        }

        response
            .json()
            .map_err(|e| DomainError::decode(e.to_string()))
    }
}

fn header_value(value: &str, sensitive: bool) -> Result<HeaderValue, DomainError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|e| DomainError::configuration(format!("Invalid header value: {}", e)))?;
    header.set_sensitive(sensitive);
    Ok(header)
}

fn custom_headers(config: &GatewayConfig) -> Result<HeaderMap, DomainError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value(&config.user_agent, false)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        header_value(&format!("Bearer {}", config.api_key), true)?,
    );
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value(&config.api_key, true)?,
    );
    Ok(headers)
}

#[async_trait]
impl Transport for BlockingTransport {
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

        let call = BlockingCall {
            url: url.to_string(),
            headers: custom_headers(config)?,
            body: WireChatRequest::from_domain(&request).to_value()?,
            timeout: config.upstream_timeout(),
        };

        debug!(method = "POST", url = %call.url, "Dispatching blocking request");

        let json = tokio::task::spawn_blocking(move || call.execute())
            .await
            .map_err(|e| DomainError::internal(format!("Blocking transport task failed: {}", e)))??;

        parse_response(json)
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}
