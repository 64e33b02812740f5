//! Response bodies returned by the backend.

use serde::{Deserialize, Serialize};

/// Supplier row from `GET /proveedores`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proveedor {
    pub idproveedor: i64,

    #[serde(default)]
    pub nombre: String,

    #[serde(default)]
    pub ruc: Option<String>,
}

/// Acknowledgement for a created purchase.
///
/// Older backends answer `{"idcompra": 12}`, newer ones also send a message,
/// so everything besides the id is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompraCreated {
    pub idcompra: i64,

    #[serde(default)]
    pub message: Option<String>,
}

/// Error body shape the backend uses for rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Picks the most useful human message out of a raw error body.
    pub(crate) fn message_from(raw: &str) -> String {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body
                .message
                .or(body.error)
                .unwrap_or_else(|| raw.trim().to_string()),
            Err(_) => raw.trim().to_string(),
        }
    }
}
