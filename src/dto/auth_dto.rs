//! DTOs de autenticación

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::organization::EntityType;

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Perfil del usuario autenticado, con sus permisos efectivos
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub is_superuser: bool,
    pub entity_id: Option<Uuid>,
    pub entity_type: Option<EntityType>,
    pub position_id: Option<Uuid>,
    pub permissions: Vec<String>,
}

impl From<&AuthenticatedUser> for MeResponse {
    fn from(user: &AuthenticatedUser) -> Self {
        let mut permissions: Vec<String> = user
            .permissions
            .iter()
            .map(|permission| permission.as_codename().to_string())
            .collect();
        permissions.sort();

        Self {
            id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            is_superuser: user.is_superuser,
            entity_id: user.entity_id,
            entity_type: user.entity_type,
            position_id: user.position_id,
            permissions,
        }
    }
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: MeResponse,
}
