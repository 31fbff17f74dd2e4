use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, GatewayConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Deadline for each inbound request; the in-flight upstream call is
    /// dropped when it fires
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 120,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(SocketAddr::from((self.host.parse::<IpAddr>()?, self.port)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// A zero deadline would time out every request, so it is refused
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.request_timeout_secs == 0 {
            return Err(DomainError::configuration(
                "server.request_timeout_secs must be greater than 0",
            ));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `APP__*` environment variables,
    /// later sources overriding earlier ones
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Like [`AppConfig::load`], with an extra file layered over `config/local`
    pub fn load_with(extra_file: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(config::File::with_name(path));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("gateway.stop")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportKind;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.gateway.max_token_length, 4000);
        assert_eq!(config.gateway.transport, TransportKind::Sdk);
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..ServerConfig::default()
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:9000");

        let bad = ServerConfig {
            host: "not-an-ip".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_zero_request_timeout_is_rejected() {
        assert!(ServerConfig::default().validate().is_ok());

        let server = ServerConfig {
            request_timeout_secs: 0,
            ..ServerConfig::default()
        };
        let err = server.validate().unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
        assert!(err.to_string().contains("server.request_timeout_secs"));
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [logging]
                format = "json"

                [gateway]
                base_url = "https://example.openai.azure.com"
                api_key = "key"
                endpoint = "chat/completions"
                transport = "blocking"
                stop = ["END"]
                upstream_timeout_secs = 10
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.gateway.transport, TransportKind::Blocking);
        assert!(config.gateway.stop.contains("END"));
        assert_eq!(config.gateway.upstream_timeout(), Some(Duration::from_secs(10)));
        assert!(config.gateway.validate().is_ok());
    }
}
