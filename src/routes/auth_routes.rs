//! Rutas de autenticación

use axum::{
    extract::{Extension, State},
    middleware,
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, MeResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/login", post(login)).merge(protected)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    request.validate()?;

    let controller = AuthController::new(
        state.pool.clone(),
        state.config.jwt_secret.clone(),
        state.config.jwt_expiration_hours,
    );
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn me(Extension(user): Extension<AuthenticatedUser>) -> AppResult<Json<MeResponse>> {
    Ok(Json(MeResponse::from(&user)))
}
