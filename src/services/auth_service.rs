//! Servicio de autenticación
//!
//! Login con username/password contra la tabla de usuarios.

use bcrypt::verify;
use sqlx::PgPool;

use crate::models::user::User;
use crate::services::jwt_service::JwtService;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthService<'a> {
    pool: &'a PgPool,
    jwt: JwtService,
}

pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: &'a PgPool, jwt: JwtService) -> Self {
        Self { pool, jwt }
    }

    /// Autentica al usuario y emite un token de acceso.
    /// El mensaje de error no distingue usuario inexistente de contraseña
    /// incorrecta.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        if !user.is_active {
            tracing::warn!("Intento de login de usuario inactivo '{}'", username);
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let password_ok = verify(password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verificando contraseña: {}", e)))?;

        if !password_ok {
            tracing::warn!("Contraseña incorrecta para '{}'", username);
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = self.jwt.generate_access_token(user.id, &user.username)?;

        tracing::info!("Login exitoso de '{}'", username);
        Ok(LoginOutcome { token, user })
    }
}
