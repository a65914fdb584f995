//! Modelos de la jerarquía organizacional
//!
//! Entidades del Cuerpo de Bomberos (compañías, comandancia, central y
//! administración), cargos con permisos asociados y asignaciones de usuarios.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de entidad - mapea al ENUM entity_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "entity_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    /// Compañía
    Company,
    /// Comandancia
    Command,
    /// Central de Comunicaciones
    Central,
    /// Administración General
    Admin,
}

/// Unidad organizativa dentro del Cuerpo de Bomberos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entity {
    pub id: Uuid,
    pub name: String,
    pub entity_type: EntityType,
}

/// Cargo que puede ocupar un usuario dentro de una entidad.
/// Si `is_unique` es true, solo una persona puede ocuparlo por entidad.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Position {
    pub id: Uuid,
    pub name: String,
    pub is_unique: bool,
}

/// Asignación activa de un usuario a un cargo dentro de una entidad.
/// Cada usuario tiene a lo más una asignación activa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_id: Uuid,
    pub position_id: Uuid,
}

/// Historial de cargos ocupados por un usuario.
/// Registro append-only escrito por los hooks del servicio de membresías.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipHistory {
    pub id: Uuid,
    pub full_name: String,
    pub entity_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
