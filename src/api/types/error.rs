//! API error body and the mapping from domain failures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, GatewayFailure, TransportError};

/// Error categories reported in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    InvalidRequestError,
    UpstreamError,
    ServiceUnavailableError,
    ServerError,
}

impl std::fmt::Display for ApiErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequestError => write!(f, "invalid_request_error"),
            Self::UpstreamError => write!(f, "upstream_error"),
            Self::ServiceUnavailableError => write!(f, "service_unavailable_error"),
            Self::ServerError => write!(f, "server_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        error_type: ApiErrorType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    param: None,
                    code: None,
                },
            },
        }
    }

    /// Add parameter info
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.response.error.param = Some(param.into());
        self
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.error.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::InvalidRequestError, message)
    }

    /// The upstream answered, but not usefully
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, ApiErrorType::UpstreamError, message)
    }

    /// The upstream could not be reached
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorType::ServiceUnavailableError,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorType::ServerError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::InvalidInput { .. } => Self::bad_request(message),
            DomainError::Transport(TransportError::Status { status, .. }) => {
                Self::bad_gateway(message).with_code(format!("upstream_status_{}", status))
            }
            DomainError::Transport(TransportError::Decode { .. }) => {
                Self::bad_gateway(message).with_code("decode_error")
            }
            DomainError::Transport(TransportError::Network { .. }) => {
                Self::unavailable(message).with_code("upstream_unreachable")
            }
            DomainError::EmptyResponse => Self::bad_gateway(message).with_code("empty_response"),
            DomainError::Configuration { .. } => Self::internal(message),
            DomainError::Internal { .. } => Self::internal(message),
        }
    }
}

impl From<GatewayFailure> for ApiError {
    fn from(failure: GatewayFailure) -> Self {
        failure.into_error().into()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.response.error.error_type, self.response.error.message
        )
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Invalid prompt");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error.error_type, ApiErrorType::InvalidRequestError);
        assert_eq!(err.response.error.message, "Invalid prompt");
    }

    #[test]
    fn test_api_error_with_param() {
        let err = ApiError::bad_request("Invalid value")
            .with_param("prompt")
            .with_code("invalid_type");

        assert_eq!(err.response.error.param, Some("prompt".to_string()));
        assert_eq!(err.response.error.code, Some("invalid_type".to_string()));
    }

    #[test]
    fn test_transport_error_mapping() {
        let status: ApiError = DomainError::upstream_status(500, "boom").into();
        assert_eq!(status.status, StatusCode::BAD_GATEWAY);
        assert_eq!(status.response.error.code.as_deref(), Some("upstream_status_500"));

        let decode: ApiError = DomainError::decode("not json").into();
        assert_eq!(decode.status, StatusCode::BAD_GATEWAY);

        let network: ApiError = DomainError::network("connection refused").into();
        assert_eq!(network.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            network.response.error.error_type,
            ApiErrorType::ServiceUnavailableError
        );
    }

    #[test]
    fn test_empty_response_mapping() {
        let err: ApiError = DomainError::EmptyResponse.into();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.response.error.code.as_deref(), Some("empty_response"));
    }

    #[test]
    fn test_server_side_mapping() {
        let config: ApiError = DomainError::configuration("missing key").into();
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);

        let internal: ApiError = DomainError::internal("join failed").into();
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unavailable("upstream down").with_code("upstream_unreachable");
        let json = serde_json::to_value(&err.response).unwrap();

        assert_eq!(json["error"]["type"], "service_unavailable_error");
        assert_eq!(json["error"]["message"], "upstream down");
        assert_eq!(json["error"]["code"], "upstream_unreachable");
        assert!(json["error"].get("param").is_none());
    }
}
