use thiserror::Error;

/// Coarse classification of a failure, independent of its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Transport,
    EmptyResponse,
    Configuration,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::Transport => write!(f, "transport_error"),
            Self::EmptyResponse => write!(f, "empty_response"),
            Self::Configuration => write!(f, "configuration_error"),
            Self::Internal => write!(f, "internal_error"),
        }
    }
}

/// Failures talking to the upstream chat-completion API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to upstream failed: {cause}")]
    Network { cause: String },

    #[error("failed to decode upstream response: {cause}")]
    Decode { cause: String },
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Provider returned no choices")]
    EmptyResponse,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn upstream_status(status: u16, body: impl Into<String>) -> Self {
        Self::Transport(TransportError::Status {
            status,
            body: body.into(),
        })
    }

    pub fn network(cause: impl Into<String>) -> Self {
        Self::Transport(TransportError::Network {
            cause: cause.into(),
        })
    }

    pub fn decode(cause: impl Into<String>) -> Self {
        Self::Transport(TransportError::Decode {
            cause: cause.into(),
        })
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Transport(_) => ErrorKind::Transport,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let error = DomainError::invalid_input("User prompt cannot be empty");
        assert_eq!(error.to_string(), "Invalid input: User prompt cannot be empty");
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_upstream_status_error() {
        let error = DomainError::upstream_status(500, "boom");
        assert_eq!(
            error.to_string(),
            "Transport error: upstream returned HTTP 500: boom"
        );
        assert_eq!(error.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_network_error_kind() {
        let error = DomainError::network("connection refused");
        assert_eq!(error.kind(), ErrorKind::Transport);
        assert!(matches!(
            error,
            DomainError::Transport(TransportError::Network { .. })
        ));
    }

    #[test]
    fn test_empty_response_kind() {
        assert_eq!(DomainError::EmptyResponse.kind(), ErrorKind::EmptyResponse);
        assert_eq!(ErrorKind::EmptyResponse.to_string(), "empty_response");
    }
}
