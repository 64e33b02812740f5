//! # API Error Type
//!
//! Unified error type for intake commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Compras Intake                         │
//! │                                                                         │
//! │  stdin line                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  "add"                                                                  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ─── CoreError::Validation ──────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Backend Error? ─── ClientError::Api ──────────── ApiError ────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  The shell prints `error [CODE] message` and keeps reading.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use compras_client::ClientError;
use compras_core::CoreError;

/// Error returned from intake commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Complete los campos obligatorios: IVA"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A field failed the commit gate
    ValidationError,

    /// Price-mode modal misuse
    PriceMode,

    /// Pending row does not exist
    NotFound,

    /// Submit with no pending products
    EmptyPurchase,

    /// Unparsable command line or argument
    InvalidInput,

    /// Backend answered 4xx
    BackendRejected,

    /// Backend unreachable, slow, or answering 5xx
    BackendUnavailable,

    /// Configuration could not be used
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::PriceMode => "PRICE_MODE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::EmptyPurchase => "EMPTY_PURCHASE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::BackendRejected => "BACKEND_REJECTED",
            ErrorCode::BackendUnavailable => "BACKEND_UNAVAILABLE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
            e @ (CoreError::PriceModeRequiresBox | CoreError::PriceModeAlreadyChosen { .. }) => {
                ApiError::new(ErrorCode::PriceMode, e.to_string())
            }
            // Rows are numbered from 1 on screen
            CoreError::RowNotFound { index, len } => ApiError::new(
                ErrorCode::NotFound,
                format!("No existe el producto en la fila {} (hay {})", index + 1, len),
            ),
            e @ CoreError::EmptyPurchase => ApiError::new(ErrorCode::EmptyPurchase, e.to_string()),
            e @ (CoreError::UnknownField(_)
            | CoreError::UnknownUnit(_)
            | CoreError::UnknownPriceMode(_)) => ApiError::invalid_input(e.to_string()),
        }
    }
}

/// Converts client errors to API errors.
impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Api { status, message } if (400..500).contains(&status) => {
                ApiError::new(ErrorCode::BackendRejected, message)
            }
            ClientError::Api { status, message } => {
                tracing::error!(status, "Backend failure: {}", message);
                ApiError::new(
                    ErrorCode::BackendUnavailable,
                    format!("El servidor respondió {status}: {message}"),
                )
            }
            e @ (ClientError::Http(_) | ClientError::Timeout(_)) => {
                tracing::error!("Backend unreachable: {}", e);
                ApiError::new(
                    ErrorCode::BackendUnavailable,
                    "No se pudo conectar con el servidor",
                )
            }
            ClientError::Decode(e) => {
                tracing::error!("Undecodable backend response: {}", e);
                ApiError::internal("Respuesta inesperada del servidor")
            }
            e @ (ClientError::InvalidConfig(_)
            | ClientError::InvalidUrl(_)
            | ClientError::ConfigLoadFailed(_)
            | ClientError::ConfigSaveFailed(_)) => ApiError::new(ErrorCode::ConfigError, e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
