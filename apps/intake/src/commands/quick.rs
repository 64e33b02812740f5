//! # Quick Entry
//!
//! Restocking a product the backend already knows: the record opens
//! prefilled with its name and is committed under its `idproducto`.

use tracing::debug;

use compras_core::IntakeRecord;

use super::RecordView;
use crate::error::ApiError;
use crate::state::DraftState;

/// Opens quick entry for product `idproducto`.
pub fn quick_entry(draft: &DraftState, idproducto: i64, nombre: &str) -> Result<RecordView, ApiError> {
    debug!(idproducto, nombre = %nombre, "quick_entry command");
    if idproducto <= 0 {
        return Err(ApiError::invalid_input(format!(
            "Identificador de producto inválido: {idproducto}"
        )));
    }

    let template = IntakeRecord {
        nombre_producto: nombre.trim().to_string(),
        ..IntakeRecord::new()
    };

    draft.with_draft_mut(|d| {
        d.start_existing(idproducto, template);
        RecordView::from(&d.current)
    })
}
