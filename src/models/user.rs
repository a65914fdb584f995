//! Modelo de User
//!
//! Usuarios del sistema. Los permisos directos viven en la tabla
//! `user_permissions`; los heredados llegan a través del cargo activo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_superuser: bool,
    pub is_active: bool,
    /// Recibe el resumen diario de documentos por vencer
    pub notify_expiration: bool,
    pub created_at: DateTime<Utc>,
}
