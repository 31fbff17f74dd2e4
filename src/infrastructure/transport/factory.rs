use std::sync::Arc;

use super::{BlockingTransport, HttpClient, ReactiveTransport, SdkTransport};
use crate::domain::{DomainError, GatewayConfig, Transport, TransportKind};

/// Factory for creating transports
#[derive(Debug)]
pub struct TransportFactory;

impl TransportFactory {
    /// Create the transport selected by `config.transport`.
    ///
    /// The configuration is validated first so a missing endpoint or
    /// deployment fails at startup rather than on the first request.
    pub fn create(config: &GatewayConfig) -> Result<Arc<dyn Transport>, DomainError> {
        config.validate()?;

        match config.transport {
            TransportKind::Sdk => {
                let http = HttpClient::with_timeout(config.upstream_timeout())?;
                Ok(Arc::new(SdkTransport::new(Arc::new(http))))
            }

            TransportKind::Reactive => {
                let http = HttpClient::with_timeout(config.upstream_timeout())?;
                Ok(Arc::new(ReactiveTransport::new(Arc::new(http))))
            }

            TransportKind::Blocking => Ok(Arc::new(BlockingTransport::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> GatewayConfig {
        GatewayConfig::new("https://test.openai.azure.com", "test-key")
    }

    #[test]
    fn test_create_sdk_transport() {
        let config = base().with_deployment("gpt35");
        let transport = TransportFactory::create(&config).unwrap();
        assert_eq!(transport.name(), "sdk");
    }

    #[test]
    fn test_create_reactive_transport() {
        let config = base()
            .with_endpoint("chat/completions")
            .with_transport(TransportKind::Reactive);
        let transport = TransportFactory::create(&config).unwrap();
        assert_eq!(transport.name(), "reactive");
    }

    #[test]
    fn test_create_blocking_transport() {
        let config = base()
            .with_endpoint("chat/completions")
            .with_transport(TransportKind::Blocking);
        let transport = TransportFactory::create(&config).unwrap();
        assert_eq!(transport.name(), "blocking");
    }

    #[test]
    fn test_factory_rejects_incomplete_config() {
        let config = base().with_transport(TransportKind::Reactive);

        let result = TransportFactory::create(&config);
        assert!(result.is_err());
        assert!(result
            .err()
            .map(|e| e.to_string().contains("gateway.endpoint"))
            .unwrap_or(false));
    }
}
