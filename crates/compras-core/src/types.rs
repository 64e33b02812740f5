//! # Domain Types
//!
//! Types shared by every purchase-entry call site.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────┐   ┌─────────────────┐                    │
//! │  │      IntakeRecord        │   │  UnidadMedida   │                    │
//! │  │  ──────────────────────  │   │  ─────────────  │                    │
//! │  │  nombre_producto         │   │  KG  UNIDAD     │                    │
//! │  │  unidad_medida  ─────────┼──►│  PAQUETE  CAJA  │                    │
//! │  │  cantidad                │   │  LITRO          │                    │
//! │  │  cant_p_caja             │   └─────────────────┘                    │
//! │  │  cant_cajas              │                                          │
//! │  │  precio_compra           │   ┌─────────────────┐                    │
//! │  │  precio_compra_caja      │   │   PriceMode     │                    │
//! │  │  precio_venta            │   │  caja_total     │                    │
//! │  │  precio_venta_caja       │   │  por_unidad     │                    │
//! │  │  modo_precio_compra ─────┼──►└─────────────────┘                    │
//! │  │  precio_venta_manual ────┼──►┌─────────────────┐                    │
//! │  │  ultimo_campo_modificado │   │ SalePriceSource │                    │
//! │  └──────────────────────────┘   │ unitario  caja  │                    │
//! │                                 └─────────────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raw Strings
//! Numeric fields keep exactly what the user typed. Parsing happens on
//! demand through [`IntakeRecord::decimal`], so a half-typed "12," survives
//! a keystroke round trip untouched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::numeric;

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit a product is purchased in.
///
/// Only [`UnidadMedida::Caja`] turns on the box-pricing reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnidadMedida {
    Kg,
    Unidad,
    Paquete,
    Caja,
    Litro,
}

impl UnidadMedida {
    /// Wire name sent to the backend.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UnidadMedida::Kg => "KG",
            UnidadMedida::Unidad => "UNIDAD",
            UnidadMedida::Paquete => "PAQUETE",
            UnidadMedida::Caja => "CAJA",
            UnidadMedida::Litro => "LITRO",
        }
    }

    #[inline]
    pub const fn is_box(&self) -> bool {
        matches!(self, UnidadMedida::Caja)
    }
}

impl fmt::Display for UnidadMedida {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnidadMedida {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KG" => Ok(UnidadMedida::Kg),
            "UNIDAD" => Ok(UnidadMedida::Unidad),
            "PAQUETE" => Ok(UnidadMedida::Paquete),
            "CAJA" => Ok(UnidadMedida::Caja),
            "LITRO" => Ok(UnidadMedida::Litro),
            other => Err(CoreError::UnknownUnit(other.to_string())),
        }
    }
}

// =============================================================================
// Purchase Price Mode
// =============================================================================

/// Which side of the purchase-price pair the user types into.
///
/// ## State Machine
/// ```text
///                 unidad_medida := CAJA (modal forces a choice)
///   ┌─────────┐ ─────────────────────────────────────► ┌──────────────┐
///   │  unset  │                                         │  caja_total  │
///   │ (None)  │ ─────────────────────────────────────► │  por_unidad  │
///   └─────────┘ ◄───────────────────────────────────── └──────────────┘
///                 unidad_medida := anything but CAJA
/// ```
/// No other transition exists short of resetting the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceMode {
    /// The user enters the price of the whole box; unit price is derived.
    CajaTotal,
    /// The user enters the unit price; box price is derived.
    PorUnidad,
}

impl fmt::Display for PriceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceMode::CajaTotal => write!(f, "caja_total"),
            PriceMode::PorUnidad => write!(f, "por_unidad"),
        }
    }
}

impl FromStr for PriceMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "caja_total" | "caja" => Ok(PriceMode::CajaTotal),
            "por_unidad" | "unidad" => Ok(PriceMode::PorUnidad),
            other => Err(CoreError::UnknownPriceMode(other.to_string())),
        }
    }
}

// =============================================================================
// Sale Price Source
// =============================================================================

/// Which sale-price field the user typed into last.
///
/// `None` on the record behaves like [`SalePriceSource::Unitario`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SalePriceSource {
    Unitario,
    Caja,
}

// =============================================================================
// Field Identity
// =============================================================================

/// Every field a purchase-entry form can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    NombreProducto,
    UnidadMedida,
    Cantidad,
    CantPCaja,
    CantCajas,
    PrecioCompra,
    PrecioCompraCaja,
    PrecioVenta,
    PrecioVentaCaja,
    Iva,
    Idcategoria,
    FechaVencimiento,
}

impl IntakeField {
    /// All fields in form order.
    pub const ALL: [IntakeField; 12] = [
        IntakeField::NombreProducto,
        IntakeField::UnidadMedida,
        IntakeField::Cantidad,
        IntakeField::CantPCaja,
        IntakeField::CantCajas,
        IntakeField::PrecioCompra,
        IntakeField::PrecioCompraCaja,
        IntakeField::PrecioVenta,
        IntakeField::PrecioVentaCaja,
        IntakeField::Iva,
        IntakeField::Idcategoria,
        IntakeField::FechaVencimiento,
    ];

    /// Field name as the backend and the front-end spell it.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IntakeField::NombreProducto => "nombre_producto",
            IntakeField::UnidadMedida => "unidad_medida",
            IntakeField::Cantidad => "cantidad",
            IntakeField::CantPCaja => "cant_p_caja",
            IntakeField::CantCajas => "cant_cajas",
            IntakeField::PrecioCompra => "precio_compra",
            IntakeField::PrecioCompraCaja => "precio_compra_caja",
            IntakeField::PrecioVenta => "precio_venta",
            IntakeField::PrecioVentaCaja => "precio_venta_caja",
            IntakeField::Iva => "iva",
            IntakeField::Idcategoria => "idcategoria",
            IntakeField::FechaVencimiento => "fecha_vencimiento",
        }
    }

    /// Label shown to the user in validation messages.
    pub const fn display_name(&self) -> &'static str {
        match self {
            IntakeField::NombreProducto => "Nombre del producto",
            IntakeField::UnidadMedida => "Unidad de medida",
            IntakeField::Cantidad => "Cantidad",
            IntakeField::CantPCaja => "Cantidad por caja",
            IntakeField::CantCajas => "Cantidad de cajas",
            IntakeField::PrecioCompra => "Precio de compra",
            IntakeField::PrecioCompraCaja => "Precio de compra por caja",
            IntakeField::PrecioVenta => "Precio de venta",
            IntakeField::PrecioVentaCaja => "Precio de venta por caja",
            IntakeField::Iva => "IVA",
            IntakeField::Idcategoria => "Categoría",
            IntakeField::FechaVencimiento => "Fecha de vencimiento",
        }
    }

    /// Fields that only mean something when the unit is CAJA.
    pub const fn is_box_field(&self) -> bool {
        matches!(
            self,
            IntakeField::CantPCaja
                | IntakeField::CantCajas
                | IntakeField::PrecioCompraCaja
                | IntakeField::PrecioVentaCaja
        )
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntakeField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        IntakeField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownField(wanted.to_string()))
    }
}

// =============================================================================
// Intake Record
// =============================================================================

/// The product-intake record being edited in one form instance.
///
/// ## Lifecycle
/// ```text
/// form opened ──► IntakeRecord::new() (empty)
///      │
///      ▼
/// every keystroke ──► reconcile::on_field_changed(...)
///      │
///      ▼
/// "Agregar" ──► validated, moved into the pending list, record reset
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IntakeRecord {
    pub nombre_producto: String,

    /// `None` until the user picks a unit.
    pub unidad_medida: Option<UnidadMedida>,

    /// Total units purchased.
    pub cantidad: String,

    /// Units contained in one box.
    pub cant_p_caja: String,

    /// Number of boxes.
    pub cant_cajas: String,

    /// Purchase price per unit.
    pub precio_compra: String,

    /// Purchase price per box.
    pub precio_compra_caja: String,

    /// Sale price per unit.
    pub precio_venta: String,

    /// Sale price per box.
    pub precio_venta_caja: String,

    pub iva: String,

    pub idcategoria: String,

    /// `YYYY-MM-DD`, or empty.
    pub fecha_vencimiento: String,

    /// `None` is the unset state of the price-mode state machine.
    pub modo_precio_compra: Option<PriceMode>,

    pub precio_venta_manual: Option<SalePriceSource>,

    /// Transient: never persisted nor sent.
    #[serde(skip)]
    #[ts(skip)]
    pub ultimo_campo_modificado: Option<IntakeField>,
}

impl IntakeRecord {
    /// Creates an empty record, as a freshly opened form shows it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the box-pricing reconciler applies.
    #[inline]
    pub fn is_box(&self) -> bool {
        self.unidad_medida.is_some_and(|u| u.is_box())
    }

    /// Returns true when the unit is CAJA but no price mode was chosen yet.
    ///
    /// The UI shows the price-mode modal while this holds.
    pub fn needs_price_mode_choice(&self) -> bool {
        self.is_box() && self.modo_precio_compra.is_none()
    }

    /// Returns the raw text of a field.
    pub fn value(&self, field: IntakeField) -> &str {
        match field {
            IntakeField::NombreProducto => &self.nombre_producto,
            IntakeField::UnidadMedida => self.unidad_medida.map(|u| u.as_str()).unwrap_or(""),
            IntakeField::Cantidad => &self.cantidad,
            IntakeField::CantPCaja => &self.cant_p_caja,
            IntakeField::CantCajas => &self.cant_cajas,
            IntakeField::PrecioCompra => &self.precio_compra,
            IntakeField::PrecioCompraCaja => &self.precio_compra_caja,
            IntakeField::PrecioVenta => &self.precio_venta,
            IntakeField::PrecioVentaCaja => &self.precio_venta_caja,
            IntakeField::Iva => &self.iva,
            IntakeField::Idcategoria => &self.idcategoria,
            IntakeField::FechaVencimiento => &self.fecha_vencimiento,
        }
    }

    /// Returns the numeric value of a field; unparsable text counts as zero.
    pub fn decimal(&self, field: IntakeField) -> Decimal {
        numeric::parse_lenient(self.value(field))
    }

    /// Stores raw user text into a field without any derivation.
    ///
    /// An unrecognised unit of measure leaves the unit unset.
    pub(crate) fn set_raw(&mut self, field: IntakeField, raw: &str) {
        match field {
            IntakeField::UnidadMedida => self.unidad_medida = raw.parse().ok(),
            other => {
                if let Some(slot) = self.text_slot_mut(other) {
                    *slot = raw.to_string();
                }
            }
        }
    }

    /// Mutable access to a text field; the unit of measure has none.
    pub(crate) fn text_slot_mut(&mut self, field: IntakeField) -> Option<&mut String> {
        let slot = match field {
            IntakeField::NombreProducto => &mut self.nombre_producto,
            IntakeField::Cantidad => &mut self.cantidad,
            IntakeField::CantPCaja => &mut self.cant_p_caja,
            IntakeField::CantCajas => &mut self.cant_cajas,
            IntakeField::PrecioCompra => &mut self.precio_compra,
            IntakeField::PrecioCompraCaja => &mut self.precio_compra_caja,
            IntakeField::PrecioVenta => &mut self.precio_venta,
            IntakeField::PrecioVentaCaja => &mut self.precio_venta_caja,
            IntakeField::Iva => &mut self.iva,
            IntakeField::Idcategoria => &mut self.idcategoria,
            IntakeField::FechaVencimiento => &mut self.fecha_vencimiento,
            IntakeField::UnidadMedida => return None,
        };
        Some(slot)
    }

    /// Clears every box-only field and the tracking state tied to them.
    pub(crate) fn clear_box_state(&mut self) {
        self.cant_p_caja.clear();
        self.cant_cajas.clear();
        self.precio_compra_caja.clear();
        self.precio_venta_caja.clear();
        self.modo_precio_compra = None;
        self.precio_venta_manual = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
