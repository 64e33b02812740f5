//! # Client Error Types
//!
//! Error types for backend calls and configuration loading.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Api { status, msg }    │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Decode                 │ │
//! │  │  ConfigLoad     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried. The caller keeps its pending list and the user
//! presses "Guardar" again.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never got an HTTP response.
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// Backend answered with a non-2xx status.
    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Backend answered 2xx with a body we could not read.
    #[error("Could not decode backend response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Returns true for 4xx answers, which mean the request itself was wrong.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if (400..500).contains(status))
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        ClientError::ConfigSaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_only_for_client_errors() {
        let bad_request = ClientError::Api {
            status: 422,
            message: "cantidad inválida".into(),
        };
        let server = ClientError::Api {
            status: 503,
            message: "down".into(),
        };
        assert!(bad_request.is_rejection());
        assert!(!server.is_rejection());
        assert!(!ClientError::Timeout(10).is_rejection());
    }

    #[test]
    fn test_api_error_message() {
        let err = ClientError::Api {
            status: 409,
            message: "factura duplicada".into(),
        };
        assert_eq!(err.to_string(), "Backend returned 409: factura duplicada");
    }
}
