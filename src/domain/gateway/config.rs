use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::chat::SamplingParams;
use crate::domain::DomainError;

/// Which transport strategy a gateway instance is wired to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Typed SDK-style client keyed by deployment name
    #[default]
    Sdk,
    /// Non-blocking HTTP client with a shared connection pool
    Reactive,
    /// Blocking HTTP client with custom headers, run off the async workers
    Blocking,
}

impl TransportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sdk => "sdk",
            Self::Reactive => "reactive",
            Self::Blocking => "blocking",
        }
    }
}

/// Process-wide gateway settings. Loaded once at startup, read-only afterwards.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub base_url: String,
    /// Path appended to `base_url` by the reactive and blocking transports
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Deployment name used by the SDK-style transport
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_system_preamble")]
    pub system_preamble: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Character budget for the user message, an approximation of a token budget
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub frequency_penalty: f32,
    #[serde(default)]
    pub presence_penalty: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default)]
    pub stop: BTreeSet<String>,
    #[serde(default = "default_true")]
    pub cache_busting: bool,
    #[serde(default)]
    pub transport: TransportKind,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default)]
    pub upstream_timeout_secs: Option<u64>,
}

fn default_api_version() -> String {
    "2023-07-01-preview".to_string()
}

fn default_system_preamble() -> String {
    "You are an AI assistant that helps people find information.".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_token_length() -> usize {
    4000
}

fn default_max_tokens() -> u32 {
    800
}

fn default_top_p() -> f32 {
    0.95
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("prompt-gateway/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoint: None,
            deployment: None,
            api_key: String::new(),
            api_version: default_api_version(),
            system_preamble: default_system_preamble(),
            temperature: default_temperature(),
            max_token_length: default_max_token_length(),
            max_tokens: default_max_tokens(),
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            top_p: default_top_p(),
            stop: BTreeSet::new(),
            cache_busting: true,
            transport: TransportKind::default(),
            user_agent: default_user_agent(),
            upstream_timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportKind) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_system_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.system_preamble = preamble.into();
        self
    }

    pub fn with_max_token_length(mut self, max_token_length: usize) -> Self {
        self.max_token_length = max_token_length;
        self
    }

    pub fn with_cache_busting(mut self, enabled: bool) -> Self {
        self.cache_busting = enabled;
        self
    }

    /// Sampling parameters every request built from this config carries
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            top_p: self.top_p,
            stop: self.stop.clone(),
        }
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_url.trim().is_empty() {
            return Err(DomainError::configuration("gateway.base_url is required"));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DomainError::configuration(format!(
                "gateway.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        if self.api_key.is_empty() {
            return Err(DomainError::configuration("gateway.api_key is required"));
        }

        if self.system_preamble.trim().is_empty() {
            return Err(DomainError::configuration(
                "gateway.system_preamble must not be empty",
            ));
        }

        if self.max_token_length == 0 {
            return Err(DomainError::configuration(
                "gateway.max_token_length must be greater than 0",
            ));
        }

        self.sampling().validate()?;

        match self.transport {
            TransportKind::Sdk if is_blank(self.deployment.as_deref()) => Err(
                DomainError::configuration("gateway.deployment is required by the sdk transport"),
            ),
            TransportKind::Reactive | TransportKind::Blocking
                if is_blank(self.endpoint.as_deref()) =>
            {
                Err(DomainError::configuration(format!(
                    "gateway.endpoint is required by the {} transport",
                    self.transport.as_str()
                )))
            }
            _ => Ok(()),
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("temperature", &self.temperature)
            .field("max_token_length", &self.max_token_length)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("cache_busting", &self.cache_busting)
            .field("transport", &self.transport)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish_non_exhaustive()
    }
}
