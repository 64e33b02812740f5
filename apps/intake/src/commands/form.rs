//! # Form Commands
//!
//! The new-product form: open a blank record, type into it, answer the
//! price-mode question, and push it into the pending list.

use serde::Serialize;
use tracing::debug;

use compras_core::{IntakeField, PendingTotals, PriceMode, ProductRef};

use super::{check_field_value, RecordView};
use crate::error::ApiError;
use crate::state::DraftState;

/// Result of "Agregar".
#[derive(Debug, Clone, Serialize)]
pub struct AddedRow {
    /// 1-based row number in the pending table.
    pub row: usize,
    pub producto: ProductRef,
    pub totals: PendingTotals,
}

/// Opens a blank record for a product the backend does not know yet.
pub fn new_product(draft: &DraftState) -> Result<RecordView, ApiError> {
    debug!("new_product command");
    draft.with_draft_mut(|d| {
        d.start_new_product();
        RecordView::from(&d.current)
    })
}

/// Applies one edit to the open record and returns it reconciled.
pub fn set_field(draft: &DraftState, field: IntakeField, value: &str) -> Result<RecordView, ApiError> {
    debug!(field = %field, value = %value, "set_field command");
    check_field_value(field, value)?;
    draft.with_draft_mut(|d| RecordView::from(d.edit_current(field, value)))
}

/// Answers the price-mode question for the open record.
pub fn choose_mode(draft: &DraftState, mode: PriceMode) -> Result<RecordView, ApiError> {
    debug!(mode = %mode, "choose_mode command");
    let view = draft.with_draft_mut(|d| d.choose_price_mode(mode).map(RecordView::from))??;
    Ok(view)
}

/// Validates the open record and appends it to the pending list.
pub fn add_product(draft: &DraftState) -> Result<AddedRow, ApiError> {
    debug!("add_product command");
    let added = draft.with_draft_mut(|d| {
        d.add_current().map(|index| AddedRow {
            row: index + 1,
            producto: d.rows()[index].producto,
            totals: d.totals(),
        })
    })??;
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn fill_box_product(draft: &DraftState) {
        new_product(draft).unwrap();
        set_field(draft, IntakeField::NombreProducto, "Agua 500ml").unwrap();
        set_field(draft, IntakeField::UnidadMedida, "CAJA").unwrap();
        choose_mode(draft, PriceMode::PorUnidad).unwrap();
        set_field(draft, IntakeField::Cantidad, "24").unwrap();
        set_field(draft, IntakeField::CantPCaja, "12").unwrap();
        set_field(draft, IntakeField::PrecioCompra, "1000").unwrap();
        set_field(draft, IntakeField::PrecioVenta, "1500").unwrap();
        set_field(draft, IntakeField::Iva, "10").unwrap();
        set_field(draft, IntakeField::Idcategoria, "3").unwrap();
    }

    #[test]
    fn test_form_reconciles_while_typing() {
        let draft = DraftState::default();
        fill_box_product(&draft);

        let current = draft.with_draft(|d| d.current.clone()).unwrap();
        assert_eq!(current.cant_cajas, "2.00");
        assert_eq!(current.precio_compra_caja, "12000.00");
        assert_eq!(current.precio_venta_caja, "18000.00");
    }

    #[test]
    fn test_add_moves_record_into_table() {
        let draft = DraftState::default();
        fill_box_product(&draft);

        let added = add_product(&draft).unwrap();
        assert_eq!(added.row, 1);
        assert!(matches!(added.producto, ProductRef::Temporary(_)));
        assert_eq!(added.totals.item_count, 1);

        let current = draft.with_draft(|d| d.current.clone()).unwrap();
        assert_eq!(current, compras_core::IntakeRecord::new());
    }

    #[test]
    fn test_add_with_missing_fields_keeps_record_open() {
        let draft = DraftState::default();
        new_product(&draft).unwrap();
        set_field(&draft, IntakeField::NombreProducto, "Arroz").unwrap();

        let err = add_product(&draft).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.starts_with("Complete los campos obligatorios"));
        assert_eq!(draft.with_draft(|d| d.current.nombre_producto.clone()).unwrap(), "Arroz");
    }

    #[test]
    fn test_mode_on_non_box_record() {
        let draft = DraftState::default();
        set_field(&draft, IntakeField::UnidadMedida, "KG").unwrap();

        let err = choose_mode(&draft, PriceMode::CajaTotal).unwrap_err();
        assert_eq!(err.code, ErrorCode::PriceMode);
    }
}
