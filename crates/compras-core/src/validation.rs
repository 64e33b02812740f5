//! # Validation Module
//!
//! The gates a record must pass before it joins the pending-products list
//! or is sent to the backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Commit Gates                                       │
//! │                                                                         │
//! │  "Agregar" / "Guardar" pressed                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  validate_required_fields  ── MissingFields (all of them, in order)    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  validate_box_consistency  ── MissingUnitsPerBox / QuantityMismatch    │
//! │           │                    (CAJA records only)                      │
//! │           ▼                                                             │
//! │  validate_expiry_date      ── InvalidDate                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  OK → record may be committed                                          │
//! │                                                                         │
//! │  Nothing is persisted or partially committed on failure.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::numeric::render_fixed;
use crate::types::{IntakeField, IntakeRecord};
use crate::{BOX_COUNT_TOLERANCE, BOX_DECIMALS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fields that must be filled in, in the order they are reported.
pub const REQUIRED_FIELDS: [IntakeField; 6] = [
    IntakeField::NombreProducto,
    IntakeField::PrecioVenta,
    IntakeField::UnidadMedida,
    IntakeField::Iva,
    IntakeField::Idcategoria,
    IntakeField::Cantidad,
];

/// Date format accepted for `fecha_vencimiento`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Gates
// =============================================================================

/// Checks that every required field has a value.
///
/// ## Example
/// ```rust
/// use compras_core::validation::validate_required_fields;
/// use compras_core::{IntakeRecord, ValidationError};
///
/// let err = validate_required_fields(&IntakeRecord::new()).unwrap_err();
/// let ValidationError::MissingFields { fields } = err else { panic!() };
/// assert_eq!(fields.len(), 6);
/// ```
pub fn validate_required_fields(record: &IntakeRecord) -> ValidationResult<()> {
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| record.value(**field).trim().is_empty())
        .map(|field| field.display_name().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields { fields: missing })
    }
}

/// Checks that a CAJA record's box count agrees with its quantities.
///
/// ## Rules
/// - Non-CAJA records always pass
/// - `cant_p_caja` must be > 0
/// - When `cant_cajas`, `cant_p_caja` and `cantidad` are all > 0,
///   `cantidad / cant_p_caja` must be within 0.01 of `cant_cajas`
///
/// ## Example
/// ```rust
/// use compras_core::validation::validate_box_consistency;
/// use compras_core::{IntakeRecord, UnidadMedida};
///
/// let mut record = IntakeRecord::new();
/// record.unidad_medida = Some(UnidadMedida::Caja);
/// record.cantidad = "55".into();
/// record.cant_p_caja = "30".into();
/// record.cant_cajas = "1.83".into();
/// assert!(validate_box_consistency(&record).is_ok());
///
/// record.cant_cajas = "1.5".into();
/// assert!(validate_box_consistency(&record).is_err());
/// ```
pub fn validate_box_consistency(record: &IntakeRecord) -> ValidationResult<()> {
    if !record.is_box() {
        return Ok(());
    }

    let cant_p_caja = record.decimal(IntakeField::CantPCaja);
    if cant_p_caja <= Decimal::ZERO {
        return Err(ValidationError::MissingUnitsPerBox);
    }

    let cantidad = record.decimal(IntakeField::Cantidad);
    let cant_cajas = record.decimal(IntakeField::CantCajas);
    if cantidad <= Decimal::ZERO || cant_cajas <= Decimal::ZERO {
        return Ok(());
    }

    // A quotient past Decimal::MAX can never match a stated box count
    let computed = cantidad.checked_div(cant_p_caja);
    if let Some(computed) = computed {
        if (computed - cant_cajas).abs() <= BOX_COUNT_TOLERANCE {
            return Ok(());
        }
    }

    Err(ValidationError::QuantityMismatch {
        cantidad,
        cant_p_caja,
        computed: match computed {
            Some(computed) => render_fixed(computed, BOX_DECIMALS),
            None => format!("más de {}", Decimal::MAX),
        },
        stated: cant_cajas,
    })
}

/// Checks that a non-empty expiry date is a calendar date.
pub fn validate_expiry_date(record: &IntakeRecord) -> ValidationResult<Option<NaiveDate>> {
    let raw = record.fecha_vencimiento.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|_| ValidationError::InvalidDate {
            field: IntakeField::FechaVencimiento.display_name().to_string(),
            value: raw.to_string(),
        })
}

/// Runs every gate in order and stops at the first failure.
pub fn validate_for_commit(record: &IntakeRecord) -> ValidationResult<()> {
    validate_required_fields(record)?;
    validate_box_consistency(record)?;
    validate_expiry_date(record)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UnidadMedida;

    fn box_record(cantidad: &str, cant_p_caja: &str, cant_cajas: &str) -> IntakeRecord {
        IntakeRecord {
            unidad_medida: Some(UnidadMedida::Caja),
            cantidad: cantidad.to_string(),
            cant_p_caja: cant_p_caja.to_string(),
            cant_cajas: cant_cajas.to_string(),
            ..IntakeRecord::default()
        }
    }

    fn complete_record() -> IntakeRecord {
        IntakeRecord {
            nombre_producto: "Galletitas surtidas".to_string(),
            precio_venta: "2500".to_string(),
            iva: "10".to_string(),
            idcategoria: "4".to_string(),
            ..box_record("24", "12", "2")
        }
    }

    #[test]
    fn test_required_fields_on_empty_record_lists_all_in_order() {
        let err = validate_required_fields(&IntakeRecord::new()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                fields: vec![
                    "Nombre del producto".to_string(),
                    "Precio de venta".to_string(),
                    "Unidad de medida".to_string(),
                    "IVA".to_string(),
                    "Categoría".to_string(),
                    "Cantidad".to_string(),
                ]
            }
        );
    }

    #[test]
    fn test_required_fields_treats_whitespace_as_missing() {
        let mut record = complete_record();
        record.iva = "  ".to_string();
        let err = validate_required_fields(&record).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields {
                fields: vec!["IVA".to_string()]
            }
        );
    }

    #[test]
    fn test_required_fields_pass_when_complete() {
        assert!(validate_required_fields(&complete_record()).is_ok());
    }

    #[test]
    fn test_box_consistency_mismatch() {
        let err = validate_box_consistency(&box_record("55", "30", "1.5")).unwrap_err();
        match err {
            ValidationError::QuantityMismatch { computed, stated, .. } => {
                assert_eq!(computed, "1.83");
                assert_eq!(stated, Decimal::new(15, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_box_consistency_within_tolerance() {
        assert!(validate_box_consistency(&box_record("55", "30", "1.83")).is_ok());
        assert!(validate_box_consistency(&box_record("55", "30", "1.84")).is_ok());
        assert!(validate_box_consistency(&box_record("55", "30", "1.82")).is_err());
    }

    #[test]
    fn test_box_consistency_requires_units_per_box() {
        for cpc in ["0", "", "abc", "-3"] {
            assert_eq!(
                validate_box_consistency(&box_record("55", cpc, "1.5")),
                Err(ValidationError::MissingUnitsPerBox),
                "cant_p_caja = {cpc:?}"
            );
        }
    }

    #[test]
    fn test_box_consistency_skips_partial_records() {
        assert!(validate_box_consistency(&box_record("", "30", "1.5")).is_ok());
        assert!(validate_box_consistency(&box_record("55", "30", "")).is_ok());
    }

    #[test]
    fn test_box_consistency_out_of_range_quotient_is_a_mismatch() {
        let record = box_record("79228162514264337593543950335", "0.5", "1");

        match validate_box_consistency(&record).unwrap_err() {
            ValidationError::QuantityMismatch { computed, stated, .. } => {
                assert_eq!(computed, "más de 79228162514264337593543950335");
                assert_eq!(stated, Decimal::ONE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_box_consistency_ignores_non_box_records() {
        let mut record = box_record("55", "0", "1.5");
        record.unidad_medida = Some(UnidadMedida::Kg);
        assert!(validate_box_consistency(&record).is_ok());
    }

    #[test]
    fn test_expiry_date() {
        let mut record = complete_record();
        assert_eq!(validate_expiry_date(&record), Ok(None));

        record.fecha_vencimiento = "2026-12-31".to_string();
        assert_eq!(
            validate_expiry_date(&record),
            Ok(NaiveDate::from_ymd_opt(2026, 12, 31))
        );

        record.fecha_vencimiento = "31/12/2026".to_string();
        assert!(matches!(
            validate_expiry_date(&record),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_validate_for_commit_reports_required_fields_first() {
        let mut record = box_record("55", "0", "1.5");
        record.nombre_producto = "Yerba".to_string();
        assert!(matches!(
            validate_for_commit(&record),
            Err(ValidationError::MissingFields { .. })
        ));

        let mut ready = complete_record();
        assert!(validate_for_commit(&ready).is_ok());
        ready.cant_cajas = "3".to_string();
        assert!(matches!(
            validate_for_commit(&ready),
            Err(ValidationError::QuantityMismatch { .. })
        ));
    }
}
