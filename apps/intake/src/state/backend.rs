//! # Backend State
//!
//! The REST client shared by every command that reaches the backend.

use compras_client::{ApiSettings, ComprasClient};

use crate::error::ApiError;

/// Wraps the backend client; `reqwest::Client` is already cheap to clone.
#[derive(Debug, Clone)]
pub struct BackendState {
    client: ComprasClient,
}

impl BackendState {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        Ok(BackendState {
            client: ComprasClient::new(settings)?,
        })
    }

    pub fn client(&self) -> &ComprasClient {
        &self.client
    }
}
