//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::ValidationError;

use crate::utils::errors::{validation_error, AppResult};

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some(Cow::from("Value cannot be empty"));
        return Err(error);
    }
    Ok(())
}

/// Convertir un instante ISO-8601 a UTC.
///
/// Acepta RFC 3339 (`2030-01-01T10:00:00Z`), fecha-hora sin zona
/// (interpretada como UTC) y fecha simple (medianoche UTC).
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    let mut error = ValidationError::new("datetime");
    error.add_param(Cow::from("value"), &value.to_string());
    error.add_param(Cow::from("format"), &"ISO-8601");
    Err(error)
}

/// Igual que `parse_instant` pero devolviendo un `AppError` asociado al campo
pub fn parse_instant_field(field: &'static str, value: &str) -> AppResult<DateTime<Utc>> {
    if value.trim().is_empty() {
        return Err(validation_error(field, format!("{} is required", field)));
    }

    parse_instant(value)
        .map_err(|_| validation_error(field, format!("{} must be an ISO-8601 date", field)))
}

/// Escapar los comodines de LIKE (`%`, `_`, `\`)
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
