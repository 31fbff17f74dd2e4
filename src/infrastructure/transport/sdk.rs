//! SDK-style transport: a typed client keyed by deployment name

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::endpoint_url;
use super::http_client::HttpClientTrait;
use super::wire::{parse_response, WireChatRequest};
use crate::domain::{ChatRequest, DomainError, GatewayConfig, ProviderResponse, Transport};

const DEFAULT_API_VERSION: &str = "2023-07-01-preview";

/// API key credential sent in the `api-key` header
#[derive(Clone)]
pub struct KeyCredential(String);

impl KeyCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for KeyCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyCredential([REDACTED])")
    }
}

/// Builder for [`AzureOpenAiClient`]
#[derive(Debug)]
pub struct AzureOpenAiClientBuilder<C: HttpClientTrait> {
    http: Arc<C>,
    credential: Option<KeyCredential>,
    endpoint: Option<String>,
    api_version: String,
}

impl<C: HttpClientTrait> AzureOpenAiClientBuilder<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self {
            http,
            credential: None,
            endpoint: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn credential(mut self, credential: KeyCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn build(self) -> Result<AzureOpenAiClient<C>, DomainError> {
        let credential = self
            .credential
            .ok_or_else(|| DomainError::configuration("client credential is required"))?;
        let endpoint = self
            .endpoint
            .ok_or_else(|| DomainError::configuration("client endpoint is required"))?;

        Ok(AzureOpenAiClient {
            http: self.http,
            credential,
            endpoint,
            api_version: self.api_version,
        })
    }
}

/// Typed chat-completions client for deployment-based endpoints
#[derive(Debug)]
pub struct AzureOpenAiClient<C: HttpClientTrait> {
    http: Arc<C>,
    credential: KeyCredential,
    endpoint: String,
    api_version: String,
}

impl<C: HttpClientTrait> AzureOpenAiClient<C> {
    pub fn builder(http: Arc<C>) -> AzureOpenAiClientBuilder<C> {
        AzureOpenAiClientBuilder::new(http)
    }

    fn chat_completions_url(&self, deployment: &str) -> Result<String, DomainError> {
        let path = format!("openai/deployments/{}/chat/completions", deployment);
        endpoint_url(&self.endpoint, &path, &self.api_version).map(|url| url.to_string())
    }

    pub async fn get_chat_completions(
        &self,
        deployment: &str,
        request: &ChatRequest,
    ) -> Result<ProviderResponse, DomainError> {
        let url = self.chat_completions_url(deployment)?;
        let body = WireChatRequest::from_domain(request).to_value()?;

        debug!(url = %url, "Calling chat completions");

        let headers = vec![
            ("api-key", self.credential.expose()),
            ("Content-Type", "application/json"),
        ];

        let json = self.http.post_json(&url, headers, &body).await?;
        parse_response(json)
    }
}

/// Transport that builds an [`AzureOpenAiClient`] per call.
///
/// Per-call clients share the underlying connection pool of `http`.
#[derive(Debug)]
pub struct SdkTransport<C: HttpClientTrait> {
    http: Arc<C>,
}

impl<C: HttpClientTrait> SdkTransport<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    fn client_for(&self, config: &GatewayConfig) -> Result<AzureOpenAiClient<C>, DomainError> {
        AzureOpenAiClient::builder(Arc::clone(&self.http))
            .credential(KeyCredential::new(config.api_key.as_str()))
            .endpoint(config.base_url.as_str())
            .api_version(config.api_version.as_str())
            .build()
    }
}

#[async_trait]
impl<C: HttpClientTrait + 'static> Transport for SdkTransport<C> {
    async fn send(
        &self,
        request: ChatRequest,
        config: &GatewayConfig,
    ) -> Result<ProviderResponse, DomainError> {
        let deployment = config
            .deployment
            .as_deref()
            .ok_or_else(|| DomainError::configuration("gateway.deployment is not set"))?;

        let client = self.client_for(config)?;
        client.get_chat_completions(deployment, &request).await
    }

    fn name(&self) -> &'static str {
        "sdk"
    }
}
