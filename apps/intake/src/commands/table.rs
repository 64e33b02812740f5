//! # Pending-Products Table
//!
//! Inline editing of rows that were already added, plus the table view.
//!
//! ## Table Display
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Proveedor: 8   Factura: 001-001-0000123                                │
//! │                                                                         │
//! │  #  Producto   Nombre              Unidad   Cantidad   Precio   Total   │
//! │  1  nuevo      Agua 500ml          CAJA     24         1000     24000   │
//! │  2  #17        Galletitas          UNIDAD   5          2500     12500   │
//! │                                                                         │
//! │  2 productos, 29 unidades, total 36500                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::Serialize;
use tracing::debug;

use compras_core::numeric::{line_cost, render_exact};
use compras_core::{IntakeField, PendingProduct, PendingTotals, ProductRef, PurchaseDraft};

use super::{check_field_value, row_index, RecordView};
use crate::error::ApiError;
use crate::state::DraftState;

/// One line of the pending table.
#[derive(Debug, Clone, Serialize)]
pub struct PendingRowView {
    /// 1-based row number.
    pub fila: usize,
    pub producto: ProductRef,
    pub nombre: String,
    pub unidad: String,
    pub cantidad: String,
    pub precio_compra: String,
    pub subtotal: String,
}

impl PendingRowView {
    fn new(fila: usize, row: &PendingProduct) -> Self {
        let record = &row.record;
        let subtotal = line_cost(
            record.decimal(IntakeField::Cantidad),
            record.decimal(IntakeField::PrecioCompra),
        );
        PendingRowView {
            fila,
            producto: row.producto,
            nombre: record.nombre_producto.clone(),
            unidad: record.value(IntakeField::UnidadMedida).to_string(),
            cantidad: record.cantidad.clone(),
            precio_compra: record.precio_compra.clone(),
            subtotal: render_exact(subtotal),
        }
    }
}

/// Header and rows of the purchase being assembled.
#[derive(Debug, Clone, Serialize)]
pub struct PendingView {
    pub idproveedor: Option<i64>,
    pub nro_factura: Option<String>,
    pub rows: Vec<PendingRowView>,
    pub totals: PendingTotals,
}

impl From<&PurchaseDraft> for PendingView {
    fn from(draft: &PurchaseDraft) -> Self {
        PendingView {
            idproveedor: draft.idproveedor,
            nro_factura: draft.nro_factura.clone(),
            rows: draft
                .rows()
                .iter()
                .enumerate()
                .map(|(i, row)| PendingRowView::new(i + 1, row))
                .collect(),
            totals: draft.totals(),
        }
    }
}

impl fmt::Display for PendingView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proveedor = self
            .idproveedor
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        let factura = self.nro_factura.as_deref().unwrap_or("-");
        writeln!(f, "  Proveedor: {proveedor}   Factura: {factura}")?;

        if self.rows.is_empty() {
            return writeln!(f, "  (sin productos pendientes)");
        }

        writeln!(
            f,
            "  {:<3} {:<10} {:<24} {:<8} {:>10} {:>12} {:>14}",
            "#", "Producto", "Nombre", "Unidad", "Cantidad", "Precio", "Total"
        )?;
        for row in &self.rows {
            let producto = match row.producto {
                ProductRef::Existing(id) => format!("#{id}"),
                ProductRef::Temporary(_) => "nuevo".to_string(),
            };
            writeln!(
                f,
                "  {:<3} {:<10} {:<24} {:<8} {:>10} {:>12} {:>14}",
                row.fila, producto, row.nombre, row.unidad, row.cantidad, row.precio_compra, row.subtotal
            )?;
        }

        writeln!(
            f,
            "  {} productos, {} unidades, total {}",
            self.totals.item_count,
            render_exact(self.totals.total_cantidad),
            render_exact(self.totals.total_compra)
        )
    }
}

/// Edits one cell of pending row `row` (1-based).
pub fn edit_row(
    draft: &DraftState,
    row: usize,
    field: IntakeField,
    value: &str,
) -> Result<RecordView, ApiError> {
    debug!(row, field = %field, value = %value, "edit_row command");
    let index = row_index(row)?;
    check_field_value(field, value)?;
    let view = draft.with_draft_mut(|d| d.edit_row(index, field, value).map(RecordView::from))??;
    Ok(view)
}

/// Drops pending row `row` (1-based) and returns the remaining table.
pub fn remove_row(draft: &DraftState, row: usize) -> Result<PendingView, ApiError> {
    debug!(row, "remove_row command");
    let index = row_index(row)?;
    let view = draft.with_draft_mut(|d| d.remove_row(index).map(|_| PendingView::from(&*d)))??;
    Ok(view)
}

/// Current header, rows and totals.
pub fn show(draft: &DraftState) -> Result<PendingView, ApiError> {
    debug!("show command");
    draft.with_draft(|d| PendingView::from(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use compras_core::{IntakeRecord, UnidadMedida};

    fn unit_row(nombre: &str, cantidad: &str, precio: &str) -> IntakeRecord {
        IntakeRecord {
            nombre_producto: nombre.into(),
            unidad_medida: Some(UnidadMedida::Unidad),
            cantidad: cantidad.into(),
            precio_compra: precio.into(),
            precio_venta: "1".into(),
            iva: "10".into(),
            idcategoria: "1".into(),
            ..IntakeRecord::default()
        }
    }

    fn draft_with_rows() -> DraftState {
        let draft = DraftState::new(Some(8));
        draft
            .with_draft_mut(|d| {
                d.start_existing(17, unit_row("Galletitas", "5", "2500"));
                d.add_current()?;
                d.start_new_product();
                d.current = unit_row("Arroz", "10", "800");
                d.add_current()
            })
            .unwrap()
            .unwrap();
        draft
    }

    #[test]
    fn test_show_lists_rows_and_totals() {
        let view = show(&draft_with_rows()).unwrap();

        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].fila, 1);
        assert_eq!(view.rows[0].subtotal, "12500");
        assert_eq!(view.rows[1].subtotal, "8000");

        let text = view.to_string();
        assert!(text.contains("Proveedor: 8"));
        assert!(text.contains("#17"));
        assert!(text.contains("nuevo"));
        assert!(text.contains("2 productos, 15 unidades, total 20500"));
    }

    #[test]
    fn test_edit_row_reconciles_box_row() {
        let draft = draft_with_rows();
        edit_row(&draft, 2, IntakeField::UnidadMedida, "CAJA").unwrap();
        edit_row(&draft, 2, IntakeField::CantPCaja, "5").unwrap();

        let view = edit_row(&draft, 2, IntakeField::CantCajas, "3").unwrap();
        assert_eq!(view.record.cantidad, "15");
    }

    #[test]
    fn test_edit_missing_row() {
        let err = edit_row(&draft_with_rows(), 3, IntakeField::Cantidad, "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No existe el producto en la fila 3 (hay 2)");
    }

    #[test]
    fn test_remove_row_renumbers() {
        let draft = draft_with_rows();
        let view = remove_row(&draft, 1).unwrap();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].fila, 1);
        assert_eq!(view.rows[0].nombre, "Arroz");
    }

    #[test]
    fn test_show_survives_oversized_row() {
        let draft = DraftState::default();
        draft
            .with_draft_mut(|d| {
                d.current = unit_row("Granel", "100000000000000000000", "100000000000");
                d.add_current()
            })
            .unwrap()
            .unwrap();

        let view = show(&draft).unwrap();
        assert_eq!(view.rows[0].subtotal, "79228162514264337593543950335");
        assert!(view.to_string().contains("total 79228162514264337593543950335"));

        // The lock is still usable afterwards
        assert_eq!(draft.with_draft(|d| d.len()).unwrap(), 1);
    }

    #[test]
    fn test_empty_table() {
        let text = show(&DraftState::default()).unwrap().to_string();
        assert!(text.contains("(sin productos pendientes)"));
    }
}
