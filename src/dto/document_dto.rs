//! DTOs de documentos almacenados

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::file::StoredFile;

/// Response de documento para la API
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: Uuid,
    pub short_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub expiration_date: Option<NaiveDate>,
    pub uploaded_at: String,
    pub is_expired: bool,
    pub days_until_expiration: Option<i64>,
}

impl FileResponse {
    pub fn from_file(file: &StoredFile, today: NaiveDate) -> Self {
        Self {
            id: file.id,
            short_name: file.short_name.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes,
            expiration_date: file.expiration_date,
            uploaded_at: file.uploaded_at.to_rfc3339(),
            is_expired: file.is_expired(today),
            days_until_expiration: file.days_until_expiration(today),
        }
    }
}
