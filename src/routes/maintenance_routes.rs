//! Rutas del flujo de mantención

use axum::{
    extract::{Extension, Path, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::common::ApiResponse;
use crate::dto::maintenance_dto::{
    CreateMaintenanceRequest, CreateQuotationRequest, EvaluationRequest,
    FinishMaintenanceRequest, MaintenanceLogResponse, QuotationResponse,
    UpdateMaintenanceRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::maintenance_log::ReviewerRole;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Rutas montadas bajo /api/units
pub fn create_unit_maintenance_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:unit_id/maintenance", get(list_for_unit))
        .route("/:unit_id/maintenance", post(create_maintenance))
        .route("/:unit_id/maintenance/:log_id", get(get_maintenance))
        .route("/:unit_id/maintenance/:log_id", put(update_maintenance))
        .route("/:unit_id/maintenance/:log_id", delete(delete_maintenance))
        .route(
            "/:unit_id/maintenance/:log_id/quotations",
            post(add_quotation),
        )
        .route(
            "/:unit_id/maintenance/:log_id/command-evaluation",
            post(command_evaluation),
        )
        .route(
            "/:unit_id/maintenance/:log_id/admin-evaluation",
            post(admin_evaluation),
        )
        .route("/:unit_id/maintenance/:log_id/finish", post(finish_maintenance))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Rutas montadas bajo /api/maintenance
pub fn create_maintenance_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_visible))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_visible(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.list_visible(&user).await?;
    Ok(Json(response))
}

async fn list_for_unit(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.list_for_unit(&user, unit_id).await?;
    Ok(Json(response))
}

async fn create_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.create(&user, unit_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Solicitud de mantención creada exitosamente".to_string(),
    )))
}

async fn get_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let (log, quotations) = controller.get_detail(&user, unit_id, log_id).await?;
    Ok(Json(json!({
        "maintenance_log": log,
        "quotations": quotations,
    })))
}

async fn update_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMaintenanceRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.update(&user, unit_id, log_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Solicitud actualizada exitosamente".to_string(),
    )))
}

async fn delete_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    controller.delete(&user, unit_id, log_id).await?;
    Ok(Json(ApiResponse::message_only(
        "Solicitud eliminada exitosamente".to_string(),
    )))
}

async fn add_quotation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<CreateQuotationRequest>,
) -> AppResult<Json<ApiResponse<QuotationResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller
        .add_quotation(&user, unit_id, log_id, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Cotización registrada correctamente".to_string(),
    )))
}

async fn command_evaluation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EvaluationRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller
        .evaluate(&user, unit_id, log_id, ReviewerRole::Command, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Evaluación de Comandancia registrada".to_string(),
    )))
}

async fn admin_evaluation(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<EvaluationRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller
        .evaluate(&user, unit_id, log_id, ReviewerRole::Admin, request)
        .await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Evaluación de Administración registrada".to_string(),
    )))
}

async fn finish_maintenance(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, log_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<FinishMaintenanceRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceLogResponse>>> {
    let controller = MaintenanceController::new(state.pool.clone());
    let response = controller.finish(&user, unit_id, log_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Solicitud finalizada exitosamente".to_string(),
    )))
}
