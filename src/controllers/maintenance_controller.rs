//! Controller del flujo de mantención
//!
//! Solicitudes, cotizaciones, evaluaciones de Comandancia y Administración
//! y cierre de solicitudes.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::maintenance_dto::{
    CreateMaintenanceRequest, CreateQuotationRequest, EvaluationRequest,
    FinishMaintenanceRequest, MaintenanceLogResponse, QuotationResponse,
    UpdateMaintenanceRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::maintenance_log::{ClosingData, Quotation, ReviewerRole};
use crate::models::permission::Permission;
use crate::repositories::file_repository::FileRepository;
use crate::repositories::maintenance_repository::MaintenanceRepository;
use crate::repositories::unit_repository::UnitRepository;
use crate::services::maintenance_service::{MaintenanceService, PaymentResponsible};
use crate::services::permission_service;
use crate::utils::errors::{AppError, AppResult};

pub struct MaintenanceController {
    pool: PgPool,
    repository: MaintenanceRepository,
    units: UnitRepository,
    files: FileRepository,
}

impl MaintenanceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: MaintenanceRepository::new(pool.clone()),
            units: UnitRepository::new(pool.clone()),
            files: FileRepository::new(pool.clone()),
            pool,
        }
    }

    async fn unit_entity(&self, unit_id: Uuid) -> AppResult<Uuid> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;
        Ok(unit.entity_id)
    }

    /// Solicitudes de una unidad visibles para el usuario
    pub async fn list_for_unit(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
    ) -> AppResult<Vec<MaintenanceLogResponse>> {
        let unit_entity_id = self.unit_entity(unit_id).await?;

        let logs = self.repository.list_for_unit(unit_id).await?;
        let visible: Vec<MaintenanceLogResponse> = logs
            .into_iter()
            .filter(|log| permission_service::can_view_maintenance(user, log, unit_entity_id))
            .map(MaintenanceLogResponse::from)
            .collect();
        Ok(visible)
    }

    /// Todas las solicitudes visibles para el usuario
    pub async fn list_visible(
        &self,
        user: &AuthenticatedUser,
    ) -> AppResult<Vec<MaintenanceLogResponse>> {
        let scope = permission_service::maintenance_visibility(user);
        let logs = self.repository.list_visible(scope).await?;
        Ok(logs.into_iter().map(MaintenanceLogResponse::from).collect())
    }

    pub async fn get_detail(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
    ) -> AppResult<(MaintenanceLogResponse, Vec<QuotationResponse>)> {
        let unit_entity_id = self.unit_entity(unit_id).await?;

        let log = self
            .repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        if !permission_service::can_view_maintenance(user, &log, unit_entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver esta solicitud".to_string(),
            ));
        }

        let quotations = self
            .repository
            .quotations_for_log(log.id)
            .await?
            .into_iter()
            .map(QuotationResponse::from)
            .collect();

        Ok((MaintenanceLogResponse::from(log), quotations))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        request: CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceLogResponse> {
        request.validate()?;

        // La unidad debe existir y ser visible para el autor
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_view_unit(user, &unit) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver esta unidad".to_string(),
            ));
        }
        if !user.has_perm(Permission::AddMaintenance) {
            return Err(AppError::Forbidden(
                "No tienes permiso para crear solicitudes de mantención".to_string(),
            ));
        }

        let responsible = PaymentResponsible::from_form_value(&request.responsible_for_payment)
            .ok_or_else(|| {
                AppError::BadRequest("Debes seleccionar quién paga".to_string())
            })?;

        let service = MaintenanceService::new(&self.pool);
        let log = service
            .create_request(
                unit_id,
                user.user_id,
                user.entity_id,
                &request.description,
                responsible,
                request.source_report_id,
            )
            .await?;

        Ok(MaintenanceLogResponse::from(log))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
        request: UpdateMaintenanceRequest,
    ) -> AppResult<MaintenanceLogResponse> {
        request.validate()?;
        let unit_entity_id = self.unit_entity(unit_id).await?;

        let log = self
            .repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        if !permission_service::can_edit_maintenance(user, &log, unit_entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para editar esta solicitud".to_string(),
            ));
        }

        let updated = self
            .repository
            .update_description(log_id, request.description.trim())
            .await?;
        Ok(MaintenanceLogResponse::from(updated))
    }

    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
    ) -> AppResult<()> {
        let unit_entity_id = self.unit_entity(unit_id).await?;

        let log = self
            .repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        if !permission_service::can_delete_maintenance(user, &log, unit_entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para eliminar esta solicitud".to_string(),
            ));
        }
        if !log.editable {
            return Err(AppError::Conflict(
                "La solicitud ya no es editable".to_string(),
            ));
        }

        self.repository.soft_delete(log_id).await
    }

    /// Registra una cotización sobre una solicitud editable
    pub async fn add_quotation(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
        request: CreateQuotationRequest,
    ) -> AppResult<QuotationResponse> {
        request.validate()?;
        let unit_entity_id = self.unit_entity(unit_id).await?;

        let log = self
            .repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        if !permission_service::can_view_maintenance(user, &log, unit_entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver esta solicitud".to_string(),
            ));
        }
        if !log.editable || log.is_rejected() {
            return Err(AppError::Conflict(
                "Esta solicitud ya no permite agregar cotizaciones".to_string(),
            ));
        }

        // El archivo debe existir antes de referenciarse
        self.files
            .find_by_id(request.file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Documento no encontrado".to_string()))?;

        let quotation = Quotation {
            id: Uuid::new_v4(),
            log_id,
            file_id: request.file_id,
            cost: request.cost,
            expiration_date: request.expiration_date,
            comment: request.comment,
            workshop_name: request.workshop_name,
            author_id: user.user_id,
            is_favorite: false,
            creation_date: Utc::now(),
            editable: true,
            deleted: false,
        };

        let created = self.repository.create_quotation(&quotation).await?;
        Ok(QuotationResponse::from(created))
    }

    /// Evaluación de Comandancia o Administración sobre una solicitud
    pub async fn evaluate(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
        role: ReviewerRole,
        request: EvaluationRequest,
    ) -> AppResult<MaintenanceLogResponse> {
        request.validate()?;

        let required = match role {
            ReviewerRole::Command => Permission::ApproveMaintenanceAsCommand,
            ReviewerRole::Admin => Permission::ApproveMaintenanceAsAdmin,
        };
        if !user.has_perm(required) {
            return Err(AppError::Forbidden(
                "No tienes permiso para evaluar esta solicitud".to_string(),
            ));
        }

        // Verifica pertenencia de la solicitud a la unidad
        self.repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        let service = MaintenanceService::new(&self.pool);
        let log = match request.decision.as_str() {
            "accept" => {
                service
                    .approve(
                        log_id,
                        role,
                        user.user_id,
                        request.observations,
                        request.quotation_id,
                    )
                    .await?
            }
            "reject" => {
                let reason = request.reject_reason.as_deref().unwrap_or_default();
                service.reject(log_id, role, user.user_id, reason).await?
            }
            _ => {
                return Err(AppError::BadRequest(
                    "Debe seleccionar si aprueba o rechaza la solicitud".to_string(),
                ))
            }
        };

        Ok(MaintenanceLogResponse::from(log))
    }

    /// Finaliza una solicitud con ambas aprobaciones y datos de cierre
    pub async fn finish(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        log_id: Uuid,
        request: FinishMaintenanceRequest,
    ) -> AppResult<MaintenanceLogResponse> {
        request.validate()?;

        if !user.has_perm(Permission::FinishMaintenance) {
            return Err(AppError::Forbidden(
                "No tienes permiso para finalizar solicitudes".to_string(),
            ));
        }

        self.repository
            .find_by_id(log_id)
            .await?
            .filter(|log| log.unit_id == unit_id)
            .ok_or_else(|| {
                AppError::NotFound("Solicitud de mantención no encontrada".to_string())
            })?;

        let service = MaintenanceService::new(&self.pool);
        let log = service
            .finish(
                log_id,
                ClosingData {
                    workshop_name: request.workshop_name,
                    dispatch_date: request.dispatch_date,
                    return_date: request.return_date,
                    cost: request.cost,
                    mileage: request.mileage,
                },
            )
            .await?;

        Ok(MaintenanceLogResponse::from(log))
    }
}
