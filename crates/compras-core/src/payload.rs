//! # Backend Payload
//!
//! The JSON shapes handed to the backend's create-purchase endpoint.
//!
//! ## Item Shape
//! ```json
//! {
//!   "idproducto": 17,            // or "idtemp": "<uuid>" for new products
//!   "cantidad": 24,
//!   "precio": 1000,
//!   "precio_compra_caja": 12000,
//!   "cant_p_caja": 12,
//!   "cant_cajas": 2,
//!   "precio_venta": 1500,
//!   "precio_venta_caja": 18000,
//!   "fecha_vencimiento": "2026-12-31",
//!   "nombre_producto": "Agua 500ml",
//!   "unidad_medida": "CAJA",
//!   "iva": "10"
//! }
//! ```
//! The key set is fixed by the existing backend; box fields are `null` for
//! anything that is not sold by CAJA.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::numeric::line_cost;
use crate::types::{IntakeField, IntakeRecord};
use crate::validation::{self, ValidationResult};

/// How a pending row points at its product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductRef {
    /// Product already known to the backend (quick entry).
    #[serde(rename = "idproducto")]
    Existing(i64),

    /// Product created by this purchase; the backend assigns the real id.
    #[serde(rename = "idtemp")]
    Temporary(Uuid),
}

impl ProductRef {
    /// Fresh temporary reference for a product typed into the form.
    pub fn temporary() -> Self {
        ProductRef::Temporary(Uuid::new_v4())
    }
}

/// One purchased product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompraItemPayload {
    #[serde(flatten)]
    pub producto: ProductRef,

    #[serde(with = "rust_decimal::serde::float")]
    pub cantidad: Decimal,

    /// Purchase price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub precio_compra_caja: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub cant_p_caja: Option<Decimal>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub cant_cajas: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float")]
    pub precio_venta: Decimal,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub precio_venta_caja: Option<Decimal>,

    pub fecha_vencimiento: Option<NaiveDate>,

    pub nombre_producto: String,

    pub unidad_medida: crate::types::UnidadMedida,

    pub iva: String,
}

impl CompraItemPayload {
    /// Validates `record` and converts it into a payload line.
    ///
    /// Runs the full commit gate, so a row edited into an inconsistent state
    /// in the table editor is caught again at submit time.
    pub fn from_record(record: &IntakeRecord, producto: ProductRef) -> ValidationResult<Self> {
        validation::validate_required_fields(record)?;
        validation::validate_box_consistency(record)?;
        let fecha_vencimiento = validation::validate_expiry_date(record)?;

        // Already covered by the required-field check
        let unidad_medida = record.unidad_medida.ok_or_else(|| ValidationError::MissingFields {
            fields: vec![IntakeField::UnidadMedida.display_name().to_string()],
        })?;

        let box_value = |field: IntakeField| unidad_medida.is_box().then(|| record.decimal(field));

        Ok(CompraItemPayload {
            producto,
            cantidad: record.decimal(IntakeField::Cantidad),
            precio: record.decimal(IntakeField::PrecioCompra),
            precio_compra_caja: box_value(IntakeField::PrecioCompraCaja),
            cant_p_caja: box_value(IntakeField::CantPCaja),
            cant_cajas: box_value(IntakeField::CantCajas),
            precio_venta: record.decimal(IntakeField::PrecioVenta),
            precio_venta_caja: box_value(IntakeField::PrecioVentaCaja),
            fecha_vencimiento,
            nombre_producto: record.nombre_producto.trim().to_string(),
            unidad_medida,
            iva: record.iva.trim().to_string(),
        })
    }

    /// Purchase cost of the line (`cantidad × precio`), saturating.
    pub fn subtotal(&self) -> Decimal {
        line_cost(self.cantidad, self.precio)
    }
}

/// Body of the create-purchase call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCompraRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idproveedor: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nro_factura: Option<String>,

    pub fecha: NaiveDate,

    pub productos: Vec<CompraItemPayload>,
}

impl CreateCompraRequest {
    /// Sum of every line's purchase cost, saturating.
    pub fn total(&self) -> Decimal {
        self.productos
            .iter()
            .map(CompraItemPayload::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnidadMedida;
    use serde_json::json;

    fn box_record() -> IntakeRecord {
        IntakeRecord {
            nombre_producto: " Agua 500ml ".to_string(),
            unidad_medida: Some(UnidadMedida::Caja),
            cantidad: "24".to_string(),
            cant_p_caja: "12".to_string(),
            cant_cajas: "2.00".to_string(),
            precio_compra: "1000".to_string(),
            precio_compra_caja: "12000.00".to_string(),
            precio_venta: "1500".to_string(),
            precio_venta_caja: "18000.00".to_string(),
            iva: "10".to_string(),
            idcategoria: "3".to_string(),
            fecha_vencimiento: "2026-12-31".to_string(),
            ..IntakeRecord::default()
        }
    }

    #[test]
    fn test_box_item_payload_keys_and_values() {
        let item = CompraItemPayload::from_record(&box_record(), ProductRef::Existing(17)).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(
            value,
            json!({
                "idproducto": 17,
                "cantidad": 24.0,
                "precio": 1000.0,
                "precio_compra_caja": 12000.0,
                "cant_p_caja": 12.0,
                "cant_cajas": 2.0,
                "precio_venta": 1500.0,
                "precio_venta_caja": 18000.0,
                "fecha_vencimiento": "2026-12-31",
                "nombre_producto": "Agua 500ml",
                "unidad_medida": "CAJA",
                "iva": "10"
            })
        );
    }

    #[test]
    fn test_new_product_uses_idtemp_key() {
        let id = Uuid::new_v4();
        let item = CompraItemPayload::from_record(&box_record(), ProductRef::Temporary(id)).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["idtemp"], json!(id.to_string()));
        assert!(value.get("idproducto").is_none());
    }

    #[test]
    fn test_non_box_item_nulls_box_fields() {
        let mut record = box_record();
        record.unidad_medida = Some(UnidadMedida::Kg);
        record.fecha_vencimiento.clear();

        let item = CompraItemPayload::from_record(&record, ProductRef::Existing(1)).unwrap();
        let value = serde_json::to_value(&item).unwrap();

        for key in ["precio_compra_caja", "cant_p_caja", "cant_cajas", "precio_venta_caja", "fecha_vencimiento"] {
            assert!(value[key].is_null(), "{key} should be null");
        }
        assert_eq!(value["unidad_medida"], json!("KG"));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let mut record = box_record();
        record.cant_cajas = "5".to_string();
        assert!(matches!(
            CompraItemPayload::from_record(&record, ProductRef::Existing(1)),
            Err(ValidationError::QuantityMismatch { .. })
        ));
    }

    #[test]
    fn test_payload_deserializes_back() {
        let item = CompraItemPayload::from_record(&box_record(), ProductRef::Existing(5)).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let back: CompraItemPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.producto, ProductRef::Existing(5));
        assert_eq!(back.cant_p_caja, Some(Decimal::from(12)));
    }

    #[test]
    fn test_request_omits_absent_supplier_and_sums_total() {
        let item = CompraItemPayload::from_record(&box_record(), ProductRef::Existing(5)).unwrap();
        let request = CreateCompraRequest {
            idproveedor: None,
            nro_factura: None,
            fecha: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            productos: vec![item.clone(), item],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("idproveedor").is_none());
        assert_eq!(value["fecha"], json!("2026-10-19"));
        assert_eq!(request.total(), Decimal::from(48000));
    }
}
