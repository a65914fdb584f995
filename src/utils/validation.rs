//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;
use validator::ValidationError;

/// Valida que una patente chilena tenga el formato correcto.
/// Formato antiguo: 2 letras + 4 dígitos (Ej AB1234)
/// Formato nuevo: 4 letras + 2 dígitos (Ej ABCD12)
pub fn validate_chilean_plate(plate: &str) -> Result<(), ValidationError> {
    let bytes = plate.as_bytes();

    let old_format = bytes.len() == 6
        && bytes[..2].iter().all(|b| b.is_ascii_uppercase())
        && bytes[2..].iter().all(|b| b.is_ascii_digit());

    let new_format = bytes.len() == 6
        && bytes[..4].iter().all(|b| b.is_ascii_uppercase())
        && bytes[4..].iter().all(|b| b.is_ascii_digit());

    if old_format || new_format {
        return Ok(());
    }

    let mut error = ValidationError::new("chilean_plate");
    error.add_param("plate".into(), &plate.to_string());
    error.add_param(
        "format".into(),
        &"AB1234 o ABCD12".to_string(),
    );
    Err(error)
}

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime.
/// Acepta RFC3339 o el formato de los formularios (`YYYY-MM-DDTHH:MM`).
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339 o YYYY-MM-DDTHH:MM".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Extensiones de documento permitidas por el sistema
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["pdf", "doc", "docx", "xls", "xlsx"];

/// Tipos MIME permitidos para documentos
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Valida un documento subido por extensión y tipo MIME.
/// Solo se permiten archivos PDF, DOC, DOCX, XLS y XLSX.
pub fn validate_document_upload(filename: &str, content_type: &str) -> Result<(), ValidationError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str())
        || !ALLOWED_MIME_TYPES.contains(&content_type)
    {
        let mut error = ValidationError::new("document_type");
        error.add_param("filename".into(), &filename.to_string());
        error.add_param("content_type".into(), &content_type.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_plates() {
        assert!(validate_chilean_plate("AB1234").is_ok());
        assert!(validate_chilean_plate("ABCD12").is_ok());
    }

    #[test]
    fn test_invalid_plates() {
        assert!(validate_chilean_plate("A1234").is_err());
        assert!(validate_chilean_plate("ab1234").is_err());
        assert!(validate_chilean_plate("ABC123").is_err());
        assert!(validate_chilean_plate("AB12345").is_err());
        assert!(validate_chilean_plate("").is_err());
    }

    #[test]
    fn test_validate_datetime_form_format() {
        let dt = validate_datetime("2025-03-14T08:30").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-14T08:30:00+00:00");
    }

    #[test]
    fn test_document_upload_whitelist() {
        assert!(validate_document_upload("cotizacion.pdf", "application/pdf").is_ok());
        assert!(validate_document_upload("foto.png", "image/png").is_err());
        // Extensión correcta con MIME incorrecto también se rechaza
        assert!(validate_document_upload("doc.pdf", "image/png").is_err());
        assert!(validate_document_upload("sin_extension", "application/pdf").is_err());
    }
}
