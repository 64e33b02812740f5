//! # Submit Commands
//!
//! Purchase header and the final "Guardar".
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "submit 2026-10-19"                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  1. Lock draft, build CreateCompraRequest (every row re-validated)     │
//! │  2. Release lock                                                       │
//! │         │                                                               │
//! │         ├── --dry-run ──► print JSON body, draft untouched              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. POST /compras                                                      │
//! │         │                                                               │
//! │         ├── error ──► draft untouched, user retries                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. Clear the rows that were sent, and the invoice number              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use tracing::{debug, info};

use compras_client::{CompraCreated, Proveedor};

use super::table::PendingView;
use crate::error::ApiError;
use crate::state::{BackendState, ConfigState, DraftState};

/// What a submit produced.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Backend accepted the purchase; the draft was cleared.
    Created(CompraCreated),

    /// Dry run: the JSON body that would have been sent.
    DryRun(String),
}

/// Sets the supplier for the purchase header.
pub fn set_proveedor(draft: &DraftState, idproveedor: i64) -> Result<PendingView, ApiError> {
    debug!(idproveedor, "set_proveedor command");
    draft.with_draft_mut(|d| {
        d.idproveedor = Some(idproveedor);
        PendingView::from(&*d)
    })
}

/// Sets or clears (empty text) the supplier invoice number.
pub fn set_factura(draft: &DraftState, nro_factura: &str) -> Result<PendingView, ApiError> {
    debug!(nro_factura = %nro_factura, "set_factura command");
    let nro = nro_factura.trim();
    draft.with_draft_mut(|d| {
        d.nro_factura = (!nro.is_empty()).then(|| nro.to_string());
        PendingView::from(&*d)
    })
}

/// Suppliers known to the backend.
pub async fn list_proveedores(backend: &BackendState) -> Result<Vec<Proveedor>, ApiError> {
    debug!("list_proveedores command");
    Ok(backend.client().list_proveedores().await?)
}

/// Sends every pending row as one purchase dated `fecha`.
pub async fn submit(
    draft: &DraftState,
    config: &ConfigState,
    backend: &BackendState,
    fecha: NaiveDate,
) -> Result<SubmitOutcome, ApiError> {
    debug!(%fecha, dry_run = config.dry_run, "submit command");
    let (request, sent) = draft.with_draft(|d| {
        d.to_request(fecha).map(|request| (request, d.rows().to_vec()))
    })??;

    if config.dry_run {
        let body = serde_json::to_string_pretty(&request)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        return Ok(SubmitOutcome::DryRun(body));
    }

    let created = backend.client().create_compra(&request).await?;

    draft.with_draft_mut(|d| d.clear_sent(&sent, request.nro_factura.as_deref()))?;
    info!(idcompra = created.idcompra, items = sent.len(), "Purchase saved, sent rows cleared");

    Ok(SubmitOutcome::Created(created))
}
