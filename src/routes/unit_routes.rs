//! Rutas de unidades

use axum::{
    extract::{Extension, Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::unit_controller::UnitController;
use crate::dto::common::ApiResponse;
use crate::dto::unit_dto::{
    CreateUnitRequest, UnitDetailResponse, UnitListItemResponse, UnitResponse, UpdateUnitRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_unit_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_units))
        .route("/", post(create_unit))
        .route("/:unit_id", get(get_unit))
        .route("/:unit_id", put(update_unit))
        .route("/:unit_id", delete(delete_unit))
        .route("/:unit_id/documents/:kind", post(attach_document))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

#[derive(Debug, Deserialize)]
struct UnitListQuery {
    search: Option<String>,
}

async fn list_units(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<UnitListQuery>,
) -> AppResult<Json<Vec<UnitListItemResponse>>> {
    let controller = UnitController::new(state.pool.clone());
    let response = controller.list(&user, query.search.as_deref()).await?;
    Ok(Json(response))
}

async fn get_unit(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<UnitDetailResponse>> {
    let controller = UnitController::new(state.pool.clone());
    let response = controller.get_detail(&user, unit_id).await?;
    Ok(Json(response))
}

async fn create_unit(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateUnitRequest>,
) -> AppResult<Json<ApiResponse<UnitResponse>>> {
    let controller = UnitController::new(state.pool.clone());
    let response = controller.create(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Unidad creada exitosamente".to_string(),
    )))
}

async fn update_unit(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(request): Json<UpdateUnitRequest>,
) -> AppResult<Json<ApiResponse<UnitResponse>>> {
    let controller = UnitController::new(state.pool.clone());
    let response = controller.update(&user, unit_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Unidad actualizada exitosamente".to_string(),
    )))
}

async fn delete_unit(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let controller = UnitController::new(state.pool.clone());
    controller.delete(&user, unit_id).await?;
    Ok(Json(ApiResponse::message_only(
        "Unidad eliminada exitosamente".to_string(),
    )))
}

#[derive(Debug, Deserialize)]
struct AttachDocumentRequest {
    file_id: Uuid,
}

async fn attach_document(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, kind)): Path<(Uuid, String)>,
    Json(request): Json<AttachDocumentRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let controller = UnitController::new(state.pool.clone());
    controller
        .attach_document(&user, unit_id, &kind, request.file_id)
        .await?;
    Ok(Json(ApiResponse::message_only(
        "Documento asociado correctamente".to_string(),
    )))
}
