//! Rutas de reportes de checklist

use axum::{
    extract::{Extension, Path, Query, State},
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::report_controller::ReportController;
use crate::dto::common::ApiResponse;
use crate::dto::report_dto::{
    CreateReportRequest, ReportCalendarResponse, ReportDetailResponse, ReportResponse,
    TemplateCategoryResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::services::notification_service::NotificationService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Rutas montadas bajo /api/units
pub fn create_unit_report_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:unit_id/reports", get(report_calendar))
        .route("/:unit_id/reports", post(create_report))
        .route("/:unit_id/reports/template", get(template_items))
        .route("/:unit_id/reports/:report_id", get(get_report))
        .route("/:unit_id/reports/:report_id", delete(delete_report))
        .route("/:unit_id/reports/:report_id/export", get(export_report))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
}

async fn report_calendar(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<ReportCalendarResponse>> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller
        .calendar(&user, unit_id, query.year, query.month)
        .await?;
    Ok(Json(response))
}

async fn template_items(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Vec<TemplateCategoryResponse>>> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.template_items(&user, unit_id).await?;
    Ok(Json(response))
}

async fn create_report(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(request): Json<CreateReportRequest>,
) -> AppResult<Json<ApiResponse<ReportResponse>>> {
    let notifications =
        NotificationService::new(state.mailer.clone(), state.config.mail_from.clone());
    let controller = ReportController::new(state.pool.clone());
    let response = controller
        .create(&user, unit_id, request, &notifications)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Reporte creado correctamente".to_string(),
    )))
}

async fn get_report(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, report_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ReportDetailResponse>> {
    let controller = ReportController::new(state.pool.clone());
    let response = controller.get_detail(&user, unit_id, report_id).await?;
    Ok(Json(response))
}

async fn delete_report(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, report_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let controller = ReportController::new(state.pool.clone());
    controller.delete(&user, unit_id, report_id).await?;
    Ok(Json(ApiResponse::message_only(
        "Reporte eliminado correctamente".to_string(),
    )))
}

/// Documento imprimible del reporte, con disposición de descarga
async fn export_report(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, report_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Response> {
    let controller = ReportController::new(state.pool.clone());
    let (filename, html) = controller.export(&user, unit_id, report_id).await?;

    let response = (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        html,
    )
        .into_response();
    Ok(response)
}
