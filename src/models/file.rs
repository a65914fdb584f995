//! Modelo de documentos almacenados
//!
//! Archivos genéricos y archivos con fecha de vencimiento (SOAP, revisión
//! técnica, permiso de circulación).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Documento almacenado - mapea exactamente a la tabla files.
/// Un `expiration_date` presente lo convierte en documento vencible.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    pub id: Uuid,
    /// Nombre físico en el directorio de almacenamiento (UUID + extensión)
    pub stored_name: String,
    /// Nombre corto visible para el usuario
    pub short_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub expiration_date: Option<NaiveDate>,
    pub uploaded_at: DateTime<Utc>,
}

impl StoredFile {
    /// True si el documento tiene vencimiento y ya expiró
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        match self.expiration_date {
            Some(expiration) => expiration < today,
            None => false,
        }
    }

    /// Días que faltan para el vencimiento. Si ya expiró, retorna 0.
    /// `None` para documentos sin vencimiento.
    pub fn days_until_expiration(&self, today: NaiveDate) -> Option<i64> {
        self.expiration_date
            .map(|expiration| expiration.signed_duration_since(today).num_days().max(0))
    }
}

/// Estado de un documento asociado a una unidad, para los listados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Valid,
    Expired,
    Missing,
}

impl DocumentStatus {
    pub fn for_file(file: Option<&StoredFile>, today: NaiveDate) -> Self {
        match file {
            Some(f) if f.is_expired(today) => DocumentStatus::Expired,
            Some(_) => DocumentStatus::Valid,
            None => DocumentStatus::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_expiring(expiration: Option<NaiveDate>) -> StoredFile {
        StoredFile {
            id: Uuid::new_v4(),
            stored_name: "abc.pdf".to_string(),
            short_name: "soap.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size_bytes: 1024,
            expiration_date: expiration,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_expiration() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let vigente = file_expiring(NaiveDate::from_ymd_opt(2025, 7, 1));
        assert!(!vigente.is_expired(today));
        assert_eq!(vigente.days_until_expiration(today), Some(16));

        let vencido = file_expiring(NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(vencido.is_expired(today));
        assert_eq!(vencido.days_until_expiration(today), Some(0));

        let sin_vencimiento = file_expiring(None);
        assert!(!sin_vencimiento.is_expired(today));
        assert_eq!(sin_vencimiento.days_until_expiration(today), None);
    }

    #[test]
    fn test_document_status() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let vigente = file_expiring(NaiveDate::from_ymd_opt(2025, 7, 1));
        let vencido = file_expiring(NaiveDate::from_ymd_opt(2025, 1, 1));

        assert_eq!(DocumentStatus::for_file(Some(&vigente), today), DocumentStatus::Valid);
        assert_eq!(DocumentStatus::for_file(Some(&vencido), today), DocumentStatus::Expired);
        assert_eq!(DocumentStatus::for_file(None, today), DocumentStatus::Missing);
    }
}
