//! DTOs de la jerarquía organizacional

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::organization::{Entity, EntityType, Membership, MembershipHistory, Position};

/// Response de entidad
#[derive(Debug, Serialize)]
pub struct EntityResponse {
    pub id: Uuid,
    pub name: String,
    pub entity_type: EntityType,
}

impl From<Entity> for EntityResponse {
    fn from(entity: Entity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            entity_type: entity.entity_type,
        }
    }
}

/// Response de cargo
#[derive(Debug, Serialize)]
pub struct PositionResponse {
    pub id: Uuid,
    pub name: String,
    pub is_unique: bool,
}

impl From<Position> for PositionResponse {
    fn from(position: Position) -> Self {
        Self {
            id: position.id,
            name: position.name,
            is_unique: position.is_unique,
        }
    }
}

/// Request para asignar (o reemplazar) el cargo activo de un usuario
#[derive(Debug, Deserialize)]
pub struct AssignMembershipRequest {
    pub user_id: Uuid,
    pub entity_id: Uuid,
    pub position_id: Uuid,
}

/// Response de asignación activa
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entity_id: Uuid,
    pub position_id: Uuid,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            id: membership.id,
            user_id: membership.user_id,
            entity_id: membership.entity_id,
            position_id: membership.position_id,
        }
    }
}

/// Fila del historial de cargos
#[derive(Debug, Serialize)]
pub struct MembershipHistoryResponse {
    pub id: Uuid,
    pub full_name: String,
    pub entity_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<MembershipHistory> for MembershipHistoryResponse {
    fn from(history: MembershipHistory) -> Self {
        Self {
            id: history.id,
            full_name: history.full_name,
            entity_id: history.entity_id,
            position_id: history.position_id,
            start_date: history.start_date,
            end_date: history.end_date,
        }
    }
}
