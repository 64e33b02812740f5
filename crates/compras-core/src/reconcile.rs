//! # Box-Pricing Reconciler
//!
//! Keeps the coupled quantity and price fields of a CAJA record consistent
//! while the user edits any one of them.
//!
//! ## Coupled Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Box-Pricing Couplings                              │
//! │                                                                         │
//! │  Quantity       cantidad ◄──── × / ÷ cant_p_caja ────► cant_cajas       │
//! │                                                                         │
//! │  Purchase    precio_compra ◄── × / ÷ cant_p_caja ──► precio_compra_caja │
//! │              (authoritative side picked once by modo_precio_compra)     │
//! │                                                                         │
//! │  Sale         precio_venta ◄── × / ÷ cant_p_caja ──► precio_venta_caja  │
//! │              (authoritative side follows the last one typed into)       │
//! │                                                                         │
//! │  The field the user typed into is never overwritten by derivation.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Precision
//! Box counts and box prices keep 2 decimals; a unit price derived from a box
//! price keeps 4. The asymmetry is deliberate.
//!
//! Nothing here fails: a missing or zero denominator just skips that
//! derivation, because the user may be halfway through typing.

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::numeric::{positive_product, positive_ratio, render_exact, render_fixed};
use crate::types::{IntakeField, IntakeRecord, PriceMode, SalePriceSource};
use crate::{BOX_DECIMALS, UNIT_PRICE_DECIMALS};

// =============================================================================
// Entry Points
// =============================================================================

/// Applies one user edit and refreshes every derivable field.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  User types "12" into "Cantidad por caja"                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  on_field_changed(record, CantPCaja, "12") ← THIS FUNCTION             │
/// │       │                                                                 │
/// │       ├── store raw "12", remember CantPCaja as last edited            │
/// │       │                                                                 │
/// │       ├── unit not CAJA? → done                                        │
/// │       │                                                                 │
/// │       └── reconcile: cant_cajas, precio_compra(_caja),                 │
/// │                      precio_venta(_caja) refreshed                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Changing the unit away from CAJA clears the box fields and sends the
/// price-mode state machine back to unset.
pub fn on_field_changed(record: &mut IntakeRecord, field: IntakeField, raw: &str) {
    let was_box = record.is_box();

    record.set_raw(field, raw);
    record.ultimo_campo_modificado = Some(field);

    if field == IntakeField::UnidadMedida {
        if was_box && !record.is_box() {
            record.clear_box_state();
        }
        return;
    }

    if record.is_box() {
        derive_in_place(record, field);
    }
}

/// Returns a copy of `record` with every field derivable from `edited`
/// recomputed.
///
/// The edited value must already be stored in the record. Non-CAJA records
/// come back unchanged.
pub fn reconcile(record: &IntakeRecord, edited: IntakeField) -> IntakeRecord {
    let mut next = record.clone();
    if next.is_box() {
        derive_in_place(&mut next, edited);
    }
    next
}

/// Records the one-time purchase-price mode choice made in the modal.
///
/// ## Transitions
/// - unset → `caja_total` | `por_unidad`: allowed while the unit is CAJA
/// - anything else: rejected
///
/// After the choice the purchase-price pair is re-derived from the side that
/// just became authoritative.
pub fn choose_price_mode(record: &mut IntakeRecord, mode: PriceMode) -> CoreResult<()> {
    if !record.is_box() {
        return Err(CoreError::PriceModeRequiresBox);
    }

    if let Some(current) = record.modo_precio_compra {
        return Err(CoreError::PriceModeAlreadyChosen {
            current: current.to_string(),
        });
    }

    record.modo_precio_compra = Some(mode);

    let authoritative = match mode {
        PriceMode::CajaTotal => IntakeField::PrecioCompraCaja,
        PriceMode::PorUnidad => IntakeField::PrecioCompra,
    };
    derive_purchase_price(record, authoritative);

    Ok(())
}

/// Discards everything typed so far, including the price-mode choice.
pub fn reset(record: &mut IntakeRecord) {
    *record = IntakeRecord::new();
}

// =============================================================================
// Derivation
// =============================================================================

fn derive_in_place(record: &mut IntakeRecord, edited: IntakeField) {
    derive_quantities(record, edited);
    derive_purchase_price(record, edited);
    derive_sale_price(record, edited);
}

fn derive_quantities(record: &mut IntakeRecord, edited: IntakeField) {
    let cantidad = record.decimal(IntakeField::Cantidad);
    let cant_p_caja = record.decimal(IntakeField::CantPCaja);
    let cant_cajas = record.decimal(IntakeField::CantCajas);

    match edited {
        IntakeField::Cantidad | IntakeField::CantPCaja => {
            if let Some(boxes) = positive_ratio(cantidad, cant_p_caja) {
                write_fixed(record, edited, IntakeField::CantCajas, boxes, BOX_DECIMALS);
            }
        }
        IntakeField::CantCajas => {
            if let Some(units) = positive_product(cant_cajas, cant_p_caja) {
                write(record, edited, IntakeField::Cantidad, render_exact(units));
            }
        }
        _ => {}
    }
}

fn derive_purchase_price(record: &mut IntakeRecord, edited: IntakeField) {
    let cant_p_caja = record.decimal(IntakeField::CantPCaja);

    match record.modo_precio_compra {
        Some(PriceMode::CajaTotal) => {
            let triggers = matches!(
                edited,
                IntakeField::CantPCaja | IntakeField::Cantidad | IntakeField::PrecioCompraCaja
            );
            if !triggers {
                return;
            }
            let box_price = record.decimal(IntakeField::PrecioCompraCaja);
            if let Some(unit) = positive_ratio(box_price, cant_p_caja) {
                write_fixed(record, edited, IntakeField::PrecioCompra, unit, UNIT_PRICE_DECIMALS);
            }
        }
        // Unit price is authoritative, also while the modal is still open
        Some(PriceMode::PorUnidad) | None => {
            let unit_price = record.decimal(IntakeField::PrecioCompra);
            if let Some(total) = positive_product(unit_price, cant_p_caja) {
                write_fixed(record, edited, IntakeField::PrecioCompraCaja, total, BOX_DECIMALS);
            }
        }
    }
}

fn derive_sale_price(record: &mut IntakeRecord, edited: IntakeField) {
    let cant_p_caja = record.decimal(IntakeField::CantPCaja);

    let source = match edited {
        IntakeField::PrecioVenta => {
            record.precio_venta_manual = Some(SalePriceSource::Unitario);
            SalePriceSource::Unitario
        }
        IntakeField::PrecioVentaCaja => {
            record.precio_venta_manual = Some(SalePriceSource::Caja);
            SalePriceSource::Caja
        }
        IntakeField::CantPCaja if cant_p_caja > Decimal::ZERO => record
            .precio_venta_manual
            .unwrap_or(SalePriceSource::Unitario),
        _ => return,
    };

    match source {
        SalePriceSource::Unitario => {
            let unit = record.decimal(IntakeField::PrecioVenta);
            if let Some(total) = positive_product(unit, cant_p_caja) {
                write_fixed(record, edited, IntakeField::PrecioVentaCaja, total, BOX_DECIMALS);
            }
        }
        SalePriceSource::Caja => {
            let total = record.decimal(IntakeField::PrecioVentaCaja);
            if let Some(unit) = positive_ratio(total, cant_p_caja) {
                write_fixed(record, edited, IntakeField::PrecioVenta, unit, UNIT_PRICE_DECIMALS);
            }
        }
    }
}

fn write_fixed(
    record: &mut IntakeRecord,
    edited: IntakeField,
    target: IntakeField,
    value: Decimal,
    dp: u32,
) {
    write(record, edited, target, render_fixed(value, dp));
}

/// Stores a derived value unless `target` is what the user just typed into.
fn write(record: &mut IntakeRecord, edited: IntakeField, target: IntakeField, text: String) {
    if target == edited {
        return;
    }
    if let Some(slot) = record.text_slot_mut(target) {
        *slot = text;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
