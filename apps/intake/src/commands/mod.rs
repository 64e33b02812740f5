//! # Commands Module
//!
//! Thin adapters between the shell and `compras-core` / `compras-client`.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Intake Commands                                   │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │  form            │ │  quick           │ │  table               │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  new_product     │ │  quick_entry     │ │  edit_row            │   │
//! │  │  set_field       │ │                  │ │  remove_row          │   │
//! │  │  choose_mode     │ │                  │ │  show                │   │
//! │  │  add_product     │ │                  │ │                      │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  submit: set_proveedor, set_factura, list_proveedores, submit    │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  All three entry points edit records through the same reconciler.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod form;
pub mod quick;
pub mod submit;
pub mod table;

use std::fmt;

use serde::Serialize;

use compras_core::{IntakeField, IntakeRecord, UnidadMedida};

use crate::error::ApiError;

// =============================================================================
// Shared Views
// =============================================================================

/// Snapshot of one record after a command touched it.
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub record: IntakeRecord,

    /// The price-mode question is pending for this record.
    pub needs_price_mode: bool,
}

impl From<&IntakeRecord> for RecordView {
    fn from(record: &IntakeRecord) -> Self {
        RecordView {
            record: record.clone(),
            needs_price_mode: record.needs_price_mode_choice(),
        }
    }
}

impl fmt::Display for RecordView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_box = self.record.is_box();
        for field in IntakeField::ALL {
            if field.is_box_field() && !is_box {
                continue;
            }
            writeln!(f, "  {:<27} {}", field.display_name(), self.record.value(field))?;
        }

        if is_box {
            let mode = self
                .record
                .modo_precio_compra
                .map(|m| m.to_string())
                .unwrap_or_else(|| "(sin elegir)".to_string());
            writeln!(f, "  {:<27} {}", "Modo de precio", mode)?;
        }

        if self.needs_price_mode {
            writeln!(f, "  ! Elija el modo de precio: mode caja_total | mode por_unidad")?;
        }
        Ok(())
    }
}

/// Rejects unit text the record would silently drop.
pub(crate) fn check_field_value(field: IntakeField, value: &str) -> Result<(), ApiError> {
    if field == IntakeField::UnidadMedida && !value.trim().is_empty() {
        value.parse::<UnidadMedida>()?;
    }
    Ok(())
}

/// Converts a 1-based row number from the screen into a list index.
pub(crate) fn row_index(row: usize) -> Result<usize, ApiError> {
    row.checked_sub(1)
        .ok_or_else(|| ApiError::invalid_input("Las filas se numeran desde 1"))
}
