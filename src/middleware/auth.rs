//! Middleware de autenticación JWT
//!
//! Decodifica el token Bearer, verifica que el usuario siga activo y resuelve
//! sus permisos efectivos: los asignados directamente más los heredados del
//! cargo de su asignación activa.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    models::organization::EntityType,
    models::permission::{parse_codenames, Permission, PermissionSet},
    models::user::User,
    state::AppState,
    utils::errors::AppError,
};

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user_id
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub is_superuser: bool,
    /// Entidad de la asignación activa, si existe
    pub entity_id: Option<Uuid>,
    pub entity_type: Option<EntityType>,
    pub position_id: Option<Uuid>,
    /// Permisos efectivos: directos ∪ heredados del cargo
    pub permissions: PermissionSet,
}

impl AuthenticatedUser {
    /// Verifica un permiso. Los superusuarios pasan todos los chequeos.
    pub fn has_perm(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipInfo {
    entity_id: Uuid,
    position_id: Uuid,
    entity_type: EntityType,
}

/// Carga el usuario autenticado con su asignación y permisos efectivos
pub async fn load_authenticated_user(pool: &PgPool, user_id: Uuid) -> Result<AuthenticatedUser, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Usuario no encontrado".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("Usuario inactivo".to_string()));
    }

    let membership = sqlx::query_as::<_, MembershipInfo>(
        r#"
        SELECT m.entity_id, m.position_id, e.entity_type
        FROM memberships m
        JOIN entities e ON e.id = m.entity_id
        WHERE m.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    // Permisos directos ∪ permisos del cargo, en una sola consulta
    let codenames: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT permission FROM user_permissions WHERE user_id = $1
        UNION
        SELECT pp.permission
        FROM position_permissions pp
        JOIN memberships m ON m.position_id = pp.position_id
        WHERE m.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        is_superuser: user.is_superuser,
        entity_id: membership.as_ref().map(|m| m.entity_id),
        entity_type: membership.as_ref().map(|m| m.entity_type),
        position_id: membership.as_ref().map(|m| m.position_id),
        permissions: parse_codenames(&codenames),
    })
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    // Decodificar y validar JWT
    let token_data = decode::<Claims>(
        auth_header,
        &DecodingKey::from_secret(state.config.jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?;

    let user_id = Uuid::parse_str(&token_data.claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de usuario inválido".to_string()))?;

    let authenticated_user = load_authenticated_user(&state.pool, user_id).await?;

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}
