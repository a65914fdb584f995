//! Repositorio de la jerarquía organizacional

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::organization::{Entity, Membership, MembershipHistory, Position};
use crate::models::permission::VisibilityScope;
use crate::utils::errors::AppResult;

pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Entidades visibles para el alcance resuelto del usuario
    pub async fn list_entities(&self, scope: VisibilityScope) -> AppResult<Vec<Entity>> {
        let entities = match scope {
            VisibilityScope::All => {
                sqlx::query_as::<_, Entity>("SELECT * FROM entities ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibilityScope::Entity(entity_id) => {
                sqlx::query_as::<_, Entity>("SELECT * FROM entities WHERE id = $1")
                    .bind(entity_id)
                    .fetch_all(&self.pool)
                    .await?
            }
            VisibilityScope::Own(_) | VisibilityScope::None => Vec::new(),
        };
        Ok(entities)
    }

    pub async fn find_entity(&self, id: Uuid) -> AppResult<Option<Entity>> {
        let entity = sqlx::query_as::<_, Entity>("SELECT * FROM entities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entity)
    }

    pub async fn list_positions(&self) -> AppResult<Vec<Position>> {
        let positions = sqlx::query_as::<_, Position>("SELECT * FROM positions ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(positions)
    }

    pub async fn find_membership_by_user(&self, user_id: Uuid) -> AppResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(membership)
    }

    /// Historial de cargos, más reciente primero
    pub async fn membership_history(&self, full_name: Option<&str>) -> AppResult<Vec<MembershipHistory>> {
        let history = sqlx::query_as::<_, MembershipHistory>(
            r#"
            SELECT * FROM membership_history
            WHERE $1::text IS NULL OR full_name = $1
            ORDER BY start_date DESC, end_date DESC NULLS FIRST
            "#,
        )
        .bind(full_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(history)
    }
}
