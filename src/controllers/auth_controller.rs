//! Controller de autenticación

use sqlx::PgPool;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, MeResponse};
use crate::middleware::auth::load_authenticated_user;
use crate::services::auth_service::AuthService;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::AppResult;

pub struct AuthController {
    pool: PgPool,
    jwt_secret: String,
    jwt_expiration_hours: i64,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt_secret: String, jwt_expiration_hours: i64) -> Self {
        Self {
            pool,
            jwt_secret,
            jwt_expiration_hours,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let jwt = JwtService::new(&self.jwt_secret, self.jwt_expiration_hours);
        let auth_service = AuthService::new(&self.pool, jwt);

        let outcome = auth_service.login(&request.username, &request.password).await?;

        // Resuelve asignación y permisos efectivos para el perfil
        let authenticated = load_authenticated_user(&self.pool, outcome.user.id).await?;

        Ok(LoginResponse {
            token: outcome.token,
            user: MeResponse::from(&authenticated),
        })
    }
}
