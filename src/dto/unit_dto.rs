//! DTOs de unidades

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::document_dto::FileResponse;
use crate::models::file::DocumentStatus;
use crate::models::unit::{FuelKind, Unit, UnitState, VehicleType};
use crate::repositories::unit_repository::UnitDocuments;

/// Request para crear una nueva unidad
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUnitRequest {
    #[validate(length(min = 1, max = 10))]
    pub unit_number: String,

    #[validate(length(min = 1, max = 100))]
    pub description: String,

    #[validate(custom = "crate::utils::validation::validate_chilean_plate")]
    pub plate_number: String,

    pub entity_id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub vehicle_type: Option<VehicleType>,
    pub fuel_kind: Option<FuelKind>,
    pub fuel_tank_capacity: Option<Decimal>,

    #[validate(length(min = 1, max = 100))]
    pub engine_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub chassis_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub tire_size: Option<String>,

    pub tire_pressure: Option<Decimal>,
}

/// Request para actualizar una unidad existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUnitRequest {
    #[validate(length(min = 1, max = 10))]
    pub unit_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub description: Option<String>,

    #[validate(custom = "crate::utils::validation::validate_chilean_plate")]
    pub plate_number: Option<String>,

    pub entity_id: Option<Uuid>,

    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub vehicle_type: Option<VehicleType>,
    pub fuel_kind: Option<FuelKind>,
    pub fuel_tank_capacity: Option<Decimal>,

    #[validate(length(min = 1, max = 100))]
    pub engine_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub chassis_number: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub tire_size: Option<String>,

    pub tire_pressure: Option<Decimal>,

    pub state: Option<UnitState>,
}

/// Response de unidad para la API
#[derive(Debug, Serialize)]
pub struct UnitResponse {
    pub id: Uuid,
    pub unit_number: String,
    pub description: String,
    pub plate_number: String,
    pub entity_id: Uuid,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<VehicleType>,
    pub fuel_kind: Option<FuelKind>,
    pub fuel_tank_capacity: Option<Decimal>,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,
    pub tire_size: Option<String>,
    pub tire_pressure: Option<Decimal>,
    pub state: UnitState,
    pub editable: bool,
    pub created_at: String,
}

impl From<Unit> for UnitResponse {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id,
            unit_number: unit.unit_number,
            description: unit.description,
            plate_number: unit.plate_number,
            entity_id: unit.entity_id,
            brand: unit.brand,
            model: unit.model,
            year: unit.year,
            vehicle_type: unit.vehicle_type,
            fuel_kind: unit.fuel_kind,
            fuel_tank_capacity: unit.fuel_tank_capacity,
            engine_number: unit.engine_number,
            chassis_number: unit.chassis_number,
            tire_size: unit.tire_size,
            tire_pressure: unit.tire_pressure,
            state: unit.state,
            editable: unit.editable,
            created_at: unit.created_at.to_rfc3339(),
        }
    }
}

/// Response de unidad para listados, con el estado de sus documentos
#[derive(Debug, Serialize)]
pub struct UnitListItemResponse {
    pub id: Uuid,
    pub unit_number: String,
    pub description: String,
    pub plate_number: String,
    pub entity_id: Uuid,
    pub state: UnitState,
    pub soap_status: DocumentStatus,
    pub technical_inspection_status: DocumentStatus,
    pub vehicle_permit_status: DocumentStatus,
}

impl UnitListItemResponse {
    pub fn from_unit(unit: &Unit, documents: &UnitDocuments, today: NaiveDate) -> Self {
        Self {
            id: unit.id,
            unit_number: unit.unit_number.clone(),
            description: unit.description.clone(),
            plate_number: unit.plate_number.clone(),
            entity_id: unit.entity_id,
            state: unit.state,
            soap_status: DocumentStatus::for_file(documents.soap.as_ref(), today),
            technical_inspection_status: DocumentStatus::for_file(
                documents.technical_inspection.as_ref(),
                today,
            ),
            vehicle_permit_status: DocumentStatus::for_file(
                documents.vehicle_permit.as_ref(),
                today,
            ),
        }
    }
}

/// Detalle de unidad con sus documentos resueltos
#[derive(Debug, Serialize)]
pub struct UnitDetailResponse {
    #[serde(flatten)]
    pub unit: UnitResponse,
    pub padron: Option<FileResponse>,
    pub soap: Option<FileResponse>,
    pub technical_inspection: Option<FileResponse>,
    pub vehicle_permit: Option<FileResponse>,
}
