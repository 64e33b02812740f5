//! # Purchase Draft
//!
//! The pending-products list a purchase accumulates before it is sent.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Purchase Draft Operations                            │
//! │                                                                         │
//! │  Call Site               Operation               Draft Change           │
//! │  ─────────               ─────────               ────────────           │
//! │                                                                         │
//! │  Form: new product ─────► start_new_product() ──► current = empty       │
//! │                                                                         │
//! │  Quick entry ───────────► start_existing(id) ───► current = template    │
//! │                                                                         │
//! │  Any keystroke ─────────► edit_current() ───────► reconcile(current)    │
//! │                                                                         │
//! │  "Agregar" ─────────────► add_current() ────────► rows.push, reset      │
//! │                                                                         │
//! │  Table cell edit ───────► edit_row(i) ──────────► reconcile(rows[i])    │
//! │                                                                         │
//! │  "Guardar" ─────────────► to_request() ─────────► (read only)           │
//! │                                                                         │
//! │  Backend said OK ───────► clear_sent(rows) ─────► sent rows dropped     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::line_cost;
use crate::payload::{CompraItemPayload, CreateCompraRequest, ProductRef};
use crate::reconcile;
use crate::types::{IntakeField, IntakeRecord, PriceMode};
use crate::validation;

/// A validated record waiting in the pending-products table.
///
/// The full record is kept, not just the payload, so the inline table
/// editor can keep reconciling it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingProduct {
    pub producto: ProductRef,
    pub record: IntakeRecord,
}

impl PendingProduct {
    /// Converts the row into a payload line, re-running the commit gate.
    pub fn to_payload(&self) -> CoreResult<CompraItemPayload> {
        Ok(CompraItemPayload::from_record(&self.record, self.producto)?)
    }
}

/// One purchase being assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseDraft {
    /// Record open in the entry form.
    pub current: IntakeRecord,

    /// Set when the current record came from quick entry on a known product.
    pub current_product: Option<i64>,

    pub idproveedor: Option<i64>,

    pub nro_factura: Option<String>,

    rows: Vec<PendingProduct>,
}

impl PurchaseDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Current record
    // =========================================================================

    /// Opens the form for a product the backend does not know yet.
    pub fn start_new_product(&mut self) {
        self.current = IntakeRecord::new();
        self.current_product = None;
    }

    /// Opens quick entry for an existing product, prefilled from `template`.
    pub fn start_existing(&mut self, idproducto: i64, template: IntakeRecord) {
        self.current = template;
        self.current_product = Some(idproducto);
    }

    /// Applies one keystroke to the open record.
    pub fn edit_current(&mut self, field: IntakeField, raw: &str) -> &IntakeRecord {
        reconcile::on_field_changed(&mut self.current, field, raw);
        &self.current
    }

    /// Answers the price-mode modal for the open record.
    pub fn choose_price_mode(&mut self, mode: PriceMode) -> CoreResult<&IntakeRecord> {
        reconcile::choose_price_mode(&mut self.current, mode)?;
        Ok(&self.current)
    }

    /// Validates the open record and moves it into the pending list.
    ///
    /// ## Returns
    /// The index of the new row. On failure nothing changes: the record stays
    /// open so the user can fix it.
    pub fn add_current(&mut self) -> CoreResult<usize> {
        validation::validate_for_commit(&self.current)?;

        let producto = match self.current_product {
            Some(id) => ProductRef::Existing(id),
            None => ProductRef::temporary(),
        };

        self.rows.push(PendingProduct {
            producto,
            record: std::mem::take(&mut self.current),
        });
        self.current_product = None;

        Ok(self.rows.len() - 1)
    }

    // =========================================================================
    // Pending rows
    // =========================================================================

    /// Pending rows in insertion order.
    pub fn rows(&self) -> &[PendingProduct] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inline table edit; reconciles the row the same way the form does.
    pub fn edit_row(&mut self, index: usize, field: IntakeField, raw: &str) -> CoreResult<&IntakeRecord> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(CoreError::RowNotFound { index, len })?;

        reconcile::on_field_changed(&mut row.record, field, raw);
        Ok(&row.record)
    }

    /// Removes a pending row.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<PendingProduct> {
        if index >= self.rows.len() {
            return Err(CoreError::RowNotFound {
                index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Forgets the pending rows and invoice number after a successful submit.
    ///
    /// The supplier is kept: consecutive purchases usually come from the
    /// same one.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.nro_factura = None;
    }

    /// Forgets only what a successful submit carried: each row in `sent`
    /// once, and the invoice number if it is still `nro_factura`.
    ///
    /// Rows added or edited while the request was in flight stay pending.
    pub fn clear_sent(&mut self, sent: &[PendingProduct], nro_factura: Option<&str>) {
        let mut unmatched: Vec<&PendingProduct> = sent.iter().collect();
        self.rows.retain(|row| match unmatched.iter().position(|s| *s == row) {
            Some(at) => {
                unmatched.swap_remove(at);
                false
            }
            None => true,
        });

        if self.nro_factura.as_deref() == nro_factura {
            self.nro_factura = None;
        }
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Builds the create-purchase request for `fecha`.
    ///
    /// Every row is validated again; the first failing row aborts the build.
    pub fn to_request(&self, fecha: NaiveDate) -> CoreResult<CreateCompraRequest> {
        if self.rows.is_empty() {
            return Err(CoreError::EmptyPurchase);
        }

        let productos = self
            .rows
            .iter()
            .map(PendingProduct::to_payload)
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(CreateCompraRequest {
            idproveedor: self.idproveedor,
            nro_factura: self.nro_factura.clone(),
            fecha,
            productos,
        })
    }

    /// Running totals for the pending table footer.
    pub fn totals(&self) -> PendingTotals {
        PendingTotals::from(self)
    }
}

/// Footer summary of the pending table.
///
/// Sums saturate at `Decimal::MAX`, so an absurd row shows a clamped total
/// rather than taking the table down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTotals {
    pub item_count: usize,
    pub total_cantidad: Decimal,
    pub total_compra: Decimal,
}

impl From<&PurchaseDraft> for PendingTotals {
    fn from(draft: &PurchaseDraft) -> Self {
        let (total_cantidad, total_compra) = draft.rows.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(qty, cost), row| {
                let cantidad = row.record.decimal(IntakeField::Cantidad);
                let precio = row.record.decimal(IntakeField::PrecioCompra);
                (
                    qty.saturating_add(cantidad),
                    cost.saturating_add(line_cost(cantidad, precio)),
                )
            },
        );

        PendingTotals {
            item_count: draft.rows.len(),
            total_cantidad,
            total_compra,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
