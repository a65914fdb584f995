//! Controller de documentos
//!
//! Subida validada por extensión y tipo MIME, descarga desde el directorio
//! de almacenamiento y disparo del resumen de vencimientos.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::dto::document_dto::FileResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::file::StoredFile;
use crate::repositories::file_repository::FileRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::notification_service::{
    compose_expiration_digest, notice_dates, ExpiringDocument, NotificationService,
};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_document_upload;

pub struct DocumentController {
    repository: FileRepository,
    users: UserRepository,
    upload_dir: PathBuf,
}

impl DocumentController {
    pub fn new(pool: PgPool, upload_dir: &str) -> Self {
        Self {
            repository: FileRepository::new(pool.clone()),
            users: UserRepository::new(pool),
            upload_dir: PathBuf::from(upload_dir),
        }
    }

    /// Guarda un documento subido. Solo PDF, DOC, DOCX, XLS y XLSX.
    pub async fn upload(
        &self,
        user: &AuthenticatedUser,
        filename: &str,
        content_type: &str,
        data: &[u8],
        expiration_date: Option<NaiveDate>,
    ) -> AppResult<FileResponse> {
        validate_document_upload(filename, content_type).map_err(|_| {
            AppError::BadRequest(
                "Solo se permiten archivos PDF, DOC, DOCX, XLS y XLSX".to_string(),
            )
        })?;

        if data.is_empty() {
            return Err(AppError::BadRequest("El archivo está vacío".to_string()));
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let file = StoredFile {
            id: Uuid::new_v4(),
            stored_name: format!("{}.{}", Uuid::new_v4(), extension),
            short_name: filename.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len() as i64,
            expiration_date,
            uploaded_at: Utc::now(),
        };

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("No se pudo crear el directorio: {}", e)))?;
        tokio::fs::write(self.upload_dir.join(&file.stored_name), data)
            .await
            .map_err(|e| AppError::Internal(format!("No se pudo guardar el archivo: {}", e)))?;

        let created = self.repository.create(&file).await?;
        tracing::info!(
            "Documento '{}' subido por '{}' ({} bytes)",
            created.short_name,
            user.username,
            created.size_bytes
        );
        Ok(FileResponse::from_file(&created, Utc::now().date_naive()))
    }

    /// Resuelve un documento para descarga: metadatos y ruta en disco
    pub async fn resolve_download(&self, file_id: Uuid) -> AppResult<(StoredFile, PathBuf)> {
        let file = self
            .repository
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Documento no encontrado".to_string()))?;

        let path = self.upload_dir.join(&file.stored_name);
        if !Path::new(&path).exists() {
            tracing::error!("Archivo físico ausente para el documento {}", file.id);
            return Err(AppError::NotFound("Documento no encontrado".to_string()));
        }

        Ok((file, path))
    }

    /// Envía el resumen de documentos por vencer o vencidos a los usuarios
    /// suscritos. El envío es de mejor esfuerzo.
    pub async fn notify_expirations(
        &self,
        user: &AuthenticatedUser,
        notifications: &NotificationService,
    ) -> AppResult<usize> {
        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden disparar las notificaciones".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        let upcoming = self.repository.expiring_on(&notice_dates(today)).await?;
        let expired = self.repository.expired_before(today).await?;

        if upcoming.is_empty() && expired.is_empty() {
            tracing::info!("Sin documentos por vencer ni vencidos; no se envían correos");
            return Ok(0);
        }

        let to_digest = |files: Vec<StoredFile>| -> Vec<ExpiringDocument> {
            files
                .into_iter()
                .filter_map(|file| {
                    file.expiration_date.map(|expiration_date| ExpiringDocument {
                        short_name: file.short_name,
                        expiration_date,
                    })
                })
                .collect()
        };

        let digest = compose_expiration_digest(&to_digest(upcoming), &to_digest(expired));
        let recipients = self.users.expiration_recipients().await?;

        let mut sent = 0;
        for recipient in &recipients {
            if let Some(email) = &recipient.email {
                notifications.send(
                    email,
                    "Notificación de documentos por vencer o vencidos",
                    &digest,
                );
                sent += 1;
            }
        }

        tracing::info!("Resumen de vencimientos enviado a {} usuarios", sent);
        Ok(sent)
    }
}
