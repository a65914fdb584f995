//! Rutas de combustible
//!
//! Cargas mensuales por unidad y catálogo de estaciones de servicio.

use axum::{
    extract::{Extension, Path, Query, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::fuel_controller::FuelController;
use crate::dto::common::ApiResponse;
use crate::dto::fuel_dto::{
    CreateFuelLogRequest, CreateStationRequest, FuelLogResponse, MonthlyFuelResponse,
    StationResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Rutas montadas bajo /api/units
pub fn create_unit_fuel_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/:unit_id/fuel", get(monthly_fuel))
        .route("/:unit_id/fuel", post(create_fuel_log))
        .route("/:unit_id/fuel/:fuel_log_id", get(get_fuel_log))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Rutas montadas bajo /api/stations
pub fn create_station_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_stations))
        .route("/", post(create_station))
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}

#[derive(Debug, Deserialize)]
struct MonthQuery {
    year: Option<i32>,
    month: Option<u32>,
}

async fn monthly_fuel(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<MonthlyFuelResponse>> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller
        .monthly(&user, unit_id, query.year, query.month)
        .await?;
    Ok(Json(response))
}

async fn create_fuel_log(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(request): Json<CreateFuelLogRequest>,
) -> AppResult<Json<ApiResponse<FuelLogResponse>>> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.create(&user, unit_id, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Registro de combustible creado exitosamente".to_string(),
    )))
}

async fn get_fuel_log(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path((unit_id, fuel_log_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<FuelLogResponse>> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.get_detail(&user, unit_id, fuel_log_id).await?;
    Ok(Json(response))
}

async fn list_stations(
    Extension(_user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<StationResponse>>> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.list_stations().await?;
    Ok(Json(response))
}

async fn create_station(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Json(request): Json<CreateStationRequest>,
) -> AppResult<Json<ApiResponse<StationResponse>>> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.create_station(&user, request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Estación creada exitosamente".to_string(),
    )))
}
