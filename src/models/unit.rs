//! Modelo de Unit
//!
//! Unidades de material mayor (vehículos) del Cuerpo de Bomberos:
//! identificación, especificaciones técnicas, documentos asociados y estado.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Automóvil
    Car = 1,
    /// Todoterreno
    Suv = 2,
    /// Camión
    Truck = 3,
    /// Furgoneta
    Van = 4,
    /// Bus
    Bus = 5,
    /// Motocicleta
    Motorcycle = 6,
    /// Ambulancia
    Ambulance = 7,
    /// Otro
    Other = 8,
}

/// Tipo de combustible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum FuelKind {
    /// Bencina
    Gasoline = 1,
    /// Diésel
    Diesel = 2,
    /// Eléctrico
    Electric = 3,
}

/// Estado operativo de la unidad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// Operativo
    InOperation = 1,
    /// En mantención
    InMaintenance = 2,
}

/// Unit - mapea exactamente a la tabla units
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Unit {
    pub id: Uuid,

    // Identificación
    pub unit_number: String,
    pub description: String,
    pub plate_number: String,
    pub entity_id: Uuid,

    // Especificaciones técnicas
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: Option<VehicleType>,
    pub fuel_kind: Option<FuelKind>,
    pub fuel_tank_capacity: Option<Decimal>,
    pub engine_number: Option<String>,
    pub chassis_number: Option<String>,

    // Neumáticos
    pub tire_size: Option<String>,
    pub tire_pressure: Option<Decimal>,

    // Documentos asociados
    pub padron_id: Option<Uuid>,
    pub soap_id: Option<Uuid>,
    pub technical_inspection_id: Option<Uuid>,
    pub vehicle_permit_id: Option<Uuid>,

    // Estado del objeto
    pub state: UnitState,
    pub editable: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Tipo de documento asociado a una unidad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitDocumentKind {
    /// Padrón (sin vencimiento)
    Padron,
    /// SOAP
    Soap,
    /// Revisión técnica
    TechnicalInspection,
    /// Permiso de circulación
    VehiclePermit,
}

impl UnitDocumentKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "padron" => Some(UnitDocumentKind::Padron),
            "soap" => Some(UnitDocumentKind::Soap),
            "technical_inspection" => Some(UnitDocumentKind::TechnicalInspection),
            "vehicle_permit" => Some(UnitDocumentKind::VehiclePermit),
            _ => None,
        }
    }

    /// Los documentos distintos del padrón exigen fecha de vencimiento
    pub fn requires_expiration(&self) -> bool {
        !matches!(self, UnitDocumentKind::Padron)
    }

    /// Columna de la tabla units que referencia el documento
    pub fn column(&self) -> &'static str {
        match self {
            UnitDocumentKind::Padron => "padron_id",
            UnitDocumentKind::Soap => "soap_id",
            UnitDocumentKind::TechnicalInspection => "technical_inspection_id",
            UnitDocumentKind::VehiclePermit => "vehicle_permit_id",
        }
    }
}
