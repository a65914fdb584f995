//! Controller de unidades
//!
//! Listado y CRUD de unidades de material mayor, con autorización por
//! niveles y decoración del estado de documentos.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::document_dto::FileResponse;
use crate::dto::unit_dto::{
    CreateUnitRequest, UnitDetailResponse, UnitListItemResponse, UnitResponse, UpdateUnitRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::unit::{Unit, UnitDocumentKind, UnitState};
use crate::repositories::file_repository::FileRepository;
use crate::repositories::unit_repository::UnitRepository;
use crate::services::permission_service;
use crate::utils::errors::{AppError, AppResult};

pub struct UnitController {
    repository: UnitRepository,
    files: FileRepository,
}

impl UnitController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: UnitRepository::new(pool.clone()),
            files: FileRepository::new(pool),
        }
    }

    /// Lista unidades visibles con estado de documentos, ordenadas por
    /// número de unidad
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        search: Option<&str>,
    ) -> AppResult<Vec<UnitListItemResponse>> {
        let scope = permission_service::unit_visibility(user);
        let units = self.repository.list(scope, search).await?;

        let today = Utc::now().date_naive();
        let mut items = Vec::with_capacity(units.len());
        for unit in &units {
            let documents = self.repository.documents(unit).await?;
            items.push(UnitListItemResponse::from_unit(unit, &documents, today));
        }
        Ok(items)
    }

    pub async fn get_detail(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
    ) -> AppResult<UnitDetailResponse> {
        let unit = self
            .repository
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_view_unit(user, &unit) {
            tracing::warn!(
                "Intento de acceso no autorizado de '{}' a la unidad {}",
                user.username,
                unit.unit_number
            );
            return Err(AppError::Forbidden(
                "No tienes autorización para acceder a esta unidad. \
                 Este intento ha sido registrado para fines de auditoría."
                    .to_string(),
            ));
        }

        let documents = self.repository.documents(&unit).await?;
        let today = Utc::now().date_naive();

        Ok(UnitDetailResponse {
            unit: UnitResponse::from(unit),
            padron: documents
                .padron
                .as_ref()
                .map(|file| FileResponse::from_file(file, today)),
            soap: documents
                .soap
                .as_ref()
                .map(|file| FileResponse::from_file(file, today)),
            technical_inspection: documents
                .technical_inspection
                .as_ref()
                .map(|file| FileResponse::from_file(file, today)),
            vehicle_permit: documents
                .vehicle_permit
                .as_ref()
                .map(|file| FileResponse::from_file(file, today)),
        })
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateUnitRequest,
    ) -> AppResult<UnitResponse> {
        request.validate()?;

        if !permission_service::can_create_unit(user, request.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para crear unidades en esta entidad".to_string(),
            ));
        }

        // Chequeos explícitos de duplicado; las restricciones UNIQUE respaldan
        if self
            .repository
            .unit_number_exists(&request.unit_number, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Ya existe una unidad con ese número".to_string(),
            ));
        }
        if self
            .repository
            .plate_number_exists(&request.plate_number, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Ya existe una unidad con esa patente".to_string(),
            ));
        }

        let unit = Unit {
            id: Uuid::new_v4(),
            unit_number: request.unit_number,
            description: request.description,
            plate_number: request.plate_number,
            entity_id: request.entity_id,
            brand: request.brand,
            model: request.model,
            year: request.year,
            vehicle_type: request.vehicle_type,
            fuel_kind: request.fuel_kind,
            fuel_tank_capacity: request.fuel_tank_capacity,
            engine_number: request.engine_number,
            chassis_number: request.chassis_number,
            tire_size: request.tire_size,
            tire_pressure: request.tire_pressure,
            padron_id: None,
            soap_id: None,
            technical_inspection_id: None,
            vehicle_permit_id: None,
            state: UnitState::InOperation,
            editable: true,
            deleted: false,
            created_at: Utc::now(),
        };

        let created = self.repository.create(&unit).await?;
        tracing::info!("Unidad {} creada por '{}'", created.unit_number, user.username);
        Ok(UnitResponse::from(created))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        request: UpdateUnitRequest,
    ) -> AppResult<UnitResponse> {
        request.validate()?;

        let mut unit = self
            .repository
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !unit.editable {
            return Err(AppError::Conflict("La unidad ya no es editable".to_string()));
        }

        let new_entity_id = request.entity_id.unwrap_or(unit.entity_id);
        if !permission_service::can_edit_unit(user, &unit, new_entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para editar esta unidad".to_string(),
            ));
        }

        if let Some(unit_number) = &request.unit_number {
            if self
                .repository
                .unit_number_exists(unit_number, Some(unit.id))
                .await?
            {
                return Err(AppError::Conflict(
                    "Ya existe una unidad con ese número".to_string(),
                ));
            }
            unit.unit_number = unit_number.clone();
        }
        if let Some(plate_number) = &request.plate_number {
            if self
                .repository
                .plate_number_exists(plate_number, Some(unit.id))
                .await?
            {
                return Err(AppError::Conflict(
                    "Ya existe una unidad con esa patente".to_string(),
                ));
            }
            unit.plate_number = plate_number.clone();
        }

        if let Some(description) = request.description {
            unit.description = description;
        }
        unit.entity_id = new_entity_id;
        unit.brand = request.brand.or(unit.brand);
        unit.model = request.model.or(unit.model);
        unit.year = request.year.or(unit.year);
        unit.vehicle_type = request.vehicle_type.or(unit.vehicle_type);
        unit.fuel_kind = request.fuel_kind.or(unit.fuel_kind);
        unit.fuel_tank_capacity = request.fuel_tank_capacity.or(unit.fuel_tank_capacity);
        unit.engine_number = request.engine_number.or(unit.engine_number);
        unit.chassis_number = request.chassis_number.or(unit.chassis_number);
        unit.tire_size = request.tire_size.or(unit.tire_size);
        unit.tire_pressure = request.tire_pressure.or(unit.tire_pressure);
        if let Some(state) = request.state {
            unit.state = state;
        }

        let updated = self.repository.update(&unit).await?;
        Ok(UnitResponse::from(updated))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, unit_id: Uuid) -> AppResult<()> {
        let unit = self
            .repository
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_delete_unit(user, &unit) {
            return Err(AppError::Forbidden(
                "No tienes permiso para eliminar esta unidad".to_string(),
            ));
        }

        self.repository.soft_delete(unit_id).await?;
        tracing::info!("Unidad {} eliminada por '{}'", unit.unit_number, user.username);
        Ok(())
    }

    /// Asocia un documento ya subido a la unidad
    pub async fn attach_document(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        kind_slug: &str,
        file_id: Uuid,
    ) -> AppResult<()> {
        let kind = UnitDocumentKind::from_slug(kind_slug).ok_or_else(|| {
            AppError::BadRequest(format!("Tipo de documento desconocido: '{}'", kind_slug))
        })?;

        let unit = self
            .repository
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_edit_unit(user, &unit, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para editar esta unidad".to_string(),
            ));
        }

        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Documento no encontrado".to_string()))?;

        if kind.requires_expiration() && file.expiration_date.is_none() {
            return Err(AppError::BadRequest(
                "Este tipo de documento requiere fecha de vencimiento".to_string(),
            ));
        }

        self.repository.set_document(unit_id, kind, file.id).await
    }
}
