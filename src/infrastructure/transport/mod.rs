//! Transport strategies for the chat-completion provider

mod blocking;
mod factory;
mod http_client;
mod reactive;
mod sdk;
pub mod wire;

pub use blocking::BlockingTransport;
pub use factory::TransportFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use reactive::ReactiveTransport;
pub use sdk::{AzureOpenAiClient, AzureOpenAiClientBuilder, KeyCredential, SdkTransport};

use reqwest::Url;

use crate::domain::DomainError;

const API_VERSION_PARAM: &str = "api-version";

/// Join `base_url` and `path` and make sure an `api-version` query parameter is present
pub(crate) fn endpoint_url(base_url: &str, path: &str, api_version: &str) -> Result<Url, DomainError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    let mut url = Url::parse(&joined).map_err(|e| {
        DomainError::configuration(format!("Invalid upstream URL '{}': {}", joined, e))
    })?;

    let has_version = url.query_pairs().any(|(k, _)| k == API_VERSION_PARAM);

    if !has_version {
        url.query_pairs_mut()
            .append_pair(API_VERSION_PARAM, api_version);
    }

    Ok(url)
}

/// Body text for an upstream error status; a failed read is reported in place of the body
pub(crate) fn error_body<E: std::fmt::Display>(read: Result<String, E>) -> String {
    read.unwrap_or_else(|e| format!("<failed to read error body: {}>", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let url = endpoint_url("https://example.com/", "/chat", "2023-07-01-preview").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/chat?api-version=2023-07-01-preview"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_existing_version() {
        let url = endpoint_url(
            "https://example.com",
            "openai/deployments/d/chat/completions?api-version=2024-02-01",
            "2023-07-01-preview",
        )
        .unwrap();

        assert_eq!(url.query(), Some("api-version=2024-02-01"));
    }

    #[test]
    fn test_endpoint_url_rejects_garbage() {
        let result = endpoint_url("not a url", "chat", "v1");
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_error_body_keeps_read_failure() {
        assert_eq!(error_body::<String>(Ok("slow down".to_string())), "slow down");
        assert_eq!(
            error_body(Err("connection reset")),
            "<failed to read error body: connection reset>"
        );
    }
}
