//! Controller de la jerarquía organizacional
//!
//! Entidades, cargos, asignaciones e historial. La administración de
//! asignaciones es exclusiva de superusuarios.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::organization_dto::{
    AssignMembershipRequest, EntityResponse, MembershipHistoryResponse, MembershipResponse,
    PositionResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::permission::VisibilityScope;
use crate::repositories::organization_repository::OrganizationRepository;
use crate::services::membership_service::MembershipService;
use crate::services::permission_service;
use crate::utils::errors::{AppError, AppResult};

pub struct OrganizationController {
    pool: PgPool,
    repository: OrganizationRepository,
}

impl OrganizationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OrganizationRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list_entities(&self, user: &AuthenticatedUser) -> AppResult<Vec<EntityResponse>> {
        let scope = permission_service::entity_visibility(user);
        let entities = self.repository.list_entities(scope).await?;
        Ok(entities.into_iter().map(EntityResponse::from).collect())
    }

    pub async fn get_entity(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<EntityResponse> {
        let entity = self
            .repository
            .find_entity(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Entidad no encontrada".to_string()))?;

        let visible = match permission_service::entity_visibility(user) {
            VisibilityScope::All => true,
            VisibilityScope::Entity(entity_id) => entity_id == id,
            _ => false,
        };
        if !visible {
            return Err(AppError::Forbidden(
                "No tienes autorización para acceder a esta entidad".to_string(),
            ));
        }

        Ok(EntityResponse::from(entity))
    }

    pub async fn list_positions(&self, user: &AuthenticatedUser) -> AppResult<Vec<PositionResponse>> {
        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden listar cargos".to_string(),
            ));
        }
        let positions = self.repository.list_positions().await?;
        Ok(positions.into_iter().map(PositionResponse::from).collect())
    }

    /// Asigna o reemplaza el cargo activo de un usuario
    pub async fn assign_membership(
        &self,
        user: &AuthenticatedUser,
        request: AssignMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden asignar cargos".to_string(),
            ));
        }

        let service = MembershipService::new(&self.pool);
        let membership = service
            .assign(request.user_id, request.entity_id, request.position_id)
            .await?;
        Ok(MembershipResponse::from(membership))
    }

    pub async fn remove_membership(&self, user: &AuthenticatedUser, user_id: Uuid) -> AppResult<()> {
        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden quitar cargos".to_string(),
            ));
        }

        let service = MembershipService::new(&self.pool);
        service.remove(user_id).await
    }

    pub async fn membership_history(
        &self,
        user: &AuthenticatedUser,
        full_name: Option<&str>,
    ) -> AppResult<Vec<MembershipHistoryResponse>> {
        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden consultar el historial".to_string(),
            ));
        }

        let history = self.repository.membership_history(full_name).await?;
        Ok(history
            .into_iter()
            .map(MembershipHistoryResponse::from)
            .collect())
    }
}
