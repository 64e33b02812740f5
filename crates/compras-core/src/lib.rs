//! # compras-core: Pure Purchase-Intake Logic
//!
//! This crate holds everything the purchase-entry screens compute, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Compras Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Intake call sites (apps/intake)                    │   │
//! │  │    New-product form ─ Quick entry ─ Pending-products table      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ (record, field, raw value)             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ compras-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ reconcile │  │ validation│  │   draft   │  │   │
//! │  │   │  Record   │  │ box/unit  │  │ required  │  │ pending   │  │   │
//! │  │   │  Fields   │  │ pricing   │  │ box check │  │ products  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CreateCompraRequest                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               compras-client (backend REST API)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Intake record, field identities, unit and price-mode enums
//! - [`numeric`] - Lenient decimal parsing and fixed-precision rendering
//! - [`reconcile`] - The box-pricing reconciler
//! - [`validation`] - Required-field and box-consistency gates
//! - [`draft`] - Pending-products list for one purchase
//! - [`payload`] - Backend request shapes
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use compras_core::{reconcile, IntakeField, IntakeRecord, PriceMode, UnidadMedida};
//!
//! let mut record = IntakeRecord::new();
//! reconcile::on_field_changed(&mut record, IntakeField::UnidadMedida, "CAJA");
//! reconcile::choose_price_mode(&mut record, PriceMode::PorUnidad).unwrap();
//!
//! reconcile::on_field_changed(&mut record, IntakeField::CantPCaja, "12");
//! reconcile::on_field_changed(&mut record, IntakeField::PrecioCompra, "1000");
//!
//! assert_eq!(record.unidad_medida, Some(UnidadMedida::Caja));
//! assert_eq!(record.precio_compra_caja, "12000.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod numeric;
pub mod payload;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{PendingProduct, PendingTotals, PurchaseDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use payload::{CompraItemPayload, CreateCompraRequest, ProductRef};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum allowed gap between `cantidad / cant_p_caja` and `cant_cajas`.
///
/// ## Business Reason
/// Box counts are rendered with two decimals, so a user copying the derived
/// value back by hand can be off by at most one hundredth.
pub const BOX_COUNT_TOLERANCE: rust_decimal::Decimal = rust_decimal::Decimal::from_parts(1, 0, 0, false, 2);

/// Decimals kept when deriving box counts and box prices.
pub const BOX_DECIMALS: u32 = 2;

/// Decimals kept when deriving a unit price from a box price.
pub const UNIT_PRICE_DECIMALS: u32 = 4;
