//! # Error Types
//!
//! Domain-specific error types for compras-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  compras-core errors (this file)                                       │
//! │  ├── CoreError        - Draft / state-machine failures                 │
//! │  └── ValidationError  - Blocking messages before "Agregar"/"Guardar"   │
//! │                                                                         │
//! │  compras-client errors (separate crate)                                │
//! │  └── ClientError      - Backend HTTP failures                          │
//! │                                                                         │
//! │  Intake app errors                                                     │
//! │  └── ApiError         - What the front-end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → alert dialog           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Messages are the Spanish text the user reads in the alert
//! 3. Every validation failure is terminal for the current attempt

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Intake logic errors outside plain field validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The price mode modal only exists for CAJA records.
    #[error("El modo de precio solo aplica a productos por CAJA")]
    PriceModeRequiresBox,

    /// The price mode was already chosen for this record.
    ///
    /// ## When This Occurs
    /// The modal fires once per record. Leaving CAJA, or resetting the
    /// record, is the only way back to the unset state.
    #[error("El modo de precio ya fue elegido ({current})")]
    PriceModeAlreadyChosen { current: String },

    /// Table editor pointed at a row that is not in the pending list.
    #[error("No existe el producto en la fila {index} (hay {len})")]
    RowNotFound { index: usize, len: usize },

    /// Submit pressed with nothing pending.
    #[error("No hay productos cargados para la compra")]
    EmptyPurchase,

    #[error("Campo desconocido: {0}")]
    UnknownField(String),

    #[error("Unidad de medida desconocida: {0}")]
    UnknownUnit(String),

    #[error("Modo de precio desconocido: {0}")]
    UnknownPriceMode(String),

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors shown to the user before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required inputs are empty; lists all of them.
    #[error("Complete los campos obligatorios: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// CAJA record without a positive units-per-box value.
    #[error("La cantidad por caja es obligatoria y debe ser mayor a 0")]
    MissingUnitsPerBox,

    /// Stated box count disagrees with `cantidad / cant_p_caja`.
    ///
    /// ## User Workflow
    /// ```text
    /// cantidad = 55, cant_p_caja = 30, cant_cajas = 1.5
    ///      │
    ///      ▼
    /// 55 / 30 = 1.83 cajas, |1.83 - 1.5| = 0.33 > 0.01
    ///      │
    ///      ▼
    /// Alert: "... corresponden 1.83 cajas, pero se indicaron 1.5"
    /// ```
    #[error(
        "La cantidad de cajas no coincide: {cantidad} unidades / {cant_p_caja} por caja \
         corresponden {computed} cajas, pero se indicaron {stated}"
    )]
    QuantityMismatch {
        cantidad: Decimal,
        cant_p_caja: Decimal,
        computed: String,
        stated: Decimal,
    },

    /// Expiry date is not `YYYY-MM-DD`.
    #[error("{field} tiene un formato inválido: {value}")]
    InvalidDate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
