//! Rutas de documentos
//!
//! Subida multipart, descarga y disparo del resumen de vencimientos.

use axum::{
    extract::{Extension, Multipart, Path, State},
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde_json::json;
use uuid::Uuid;

use crate::controllers::document_controller::DocumentController;
use crate::dto::common::ApiResponse;
use crate::dto::document_dto::FileResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_date;

pub fn create_document_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(upload_document))
        .route("/:id/download", get(download_document))
        .route("/notify-expirations", post(notify_expirations))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Campos del multipart: `file` (requerido) y `expiration_date` (opcional,
/// formato YYYY-MM-DD)
async fn upload_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<FileResponse>>> {
    let mut file_data: Option<(String, String, Vec<u8>)> = None;
    let mut expiration_date: Option<NaiveDate> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart inválido: {}", e)))?
    {
        let name = field.name().map(|value| value.to_string());
        match name.as_deref() {
            Some("file") => {
                let filename = field
                    .file_name()
                    .ok_or_else(|| {
                        AppError::BadRequest("El archivo no tiene nombre".to_string())
                    })?
                    .to_string();
                let content_type = field
                    .content_type()
                    .ok_or_else(|| {
                        AppError::BadRequest("El archivo no declara tipo MIME".to_string())
                    })?
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Error leyendo el archivo: {}", e)))?;
                file_data = Some((filename, content_type, data.to_vec()));
            }
            Some("expiration_date") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Campo inválido: {}", e)))?;
                if !value.trim().is_empty() {
                    let parsed = validate_date(value.trim()).map_err(|_| {
                        AppError::BadRequest(
                            "Fecha de vencimiento inválida (formato YYYY-MM-DD)".to_string(),
                        )
                    })?;
                    expiration_date = Some(parsed);
                }
            }
            _ => {}
        }
    }

    let (filename, content_type, data) = file_data
        .ok_or_else(|| AppError::BadRequest("Falta el campo 'file'".to_string()))?;

    let controller = DocumentController::new(state.pool.clone(), &state.config.upload_dir);
    let response = controller
        .upload(&user, &filename, &content_type, &data, expiration_date)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Documento subido correctamente".to_string(),
    )))
}

async fn download_document(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let controller = DocumentController::new(state.pool.clone(), &state.config.upload_dir);
    let (file, path) = controller.resolve_download(id).await?;

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::Internal(format!("No se pudo leer el archivo: {}", e)))?;

    let response = (
        [
            (header::CONTENT_TYPE, file.content_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.short_name),
            ),
        ],
        data,
    )
        .into_response();
    Ok(response)
}

async fn notify_expirations(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let notifications =
        NotificationService::new(state.mailer.clone(), state.config.mail_from.clone());
    let controller = DocumentController::new(state.pool.clone(), &state.config.upload_dir);
    let sent = controller.notify_expirations(&user, &notifications).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Resumen de vencimientos enviado a {} usuarios", sent),
    })))
}
