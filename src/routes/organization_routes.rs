//! Rutas de entidades, cargos y asignaciones

use axum::{
    extract::{Extension, Path, Query, State},
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::organization_controller::OrganizationController;
use crate::dto::common::ApiResponse;
use crate::dto::organization_dto::{
    AssignMembershipRequest, EntityResponse, MembershipHistoryResponse, MembershipResponse,
    PositionResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_organization_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/entities", get(list_entities))
        .route("/entities/:id", get(get_entity))
        .route("/positions", get(list_positions))
        .route("/memberships", post(assign_membership))
        .route("/memberships/:user_id", delete(remove_membership))
        .route("/memberships/history", get(membership_history))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_entities(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EntityResponse>>> {
    let controller = OrganizationController::new(state.pool.clone());
    let response = controller.list_entities(&user).await?;
    Ok(Json(response))
}

async fn get_entity(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EntityResponse>> {
    let controller = OrganizationController::new(state.pool.clone());
    let response = controller.get_entity(&user, id).await?;
    Ok(Json(response))
}

async fn list_positions(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PositionResponse>>> {
    let controller = OrganizationController::new(state.pool.clone());
    let response = controller.list_positions(&user).await?;
    Ok(Json(response))
}

async fn assign_membership(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<AssignMembershipRequest>,
) -> AppResult<Json<ApiResponse<MembershipResponse>>> {
    let controller = OrganizationController::new(state.pool.clone());
    let response = controller.assign_membership(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Cargo asignado correctamente".to_string(),
    )))
}

async fn remove_membership(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let controller = OrganizationController::new(state.pool.clone());
    controller.remove_membership(&user, user_id).await?;
    Ok(Json(ApiResponse::message_only(
        "Asignación eliminada correctamente".to_string(),
    )))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    full_name: Option<String>,
}

async fn membership_history(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<MembershipHistoryResponse>>> {
    let controller = OrganizationController::new(state.pool.clone());
    let response = controller
        .membership_history(&user, query.full_name.as_deref())
        .await?;
    Ok(Json(response))
}
