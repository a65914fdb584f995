//! DTOs de combustible

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::fuel_log::{FuelLog, Station};

/// Request para crear una estación de servicio
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
}

/// Response de estación
#[derive(Debug, Serialize)]
pub struct StationResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<Station> for StationResponse {
    fn from(station: Station) -> Self {
        Self {
            id: station.id,
            name: station.name,
        }
    }
}

/// Request para registrar una carga de combustible
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFuelLogRequest {
    pub station_id: Uuid,

    #[validate(range(min = 1))]
    pub guide_number: i64,

    /// Fecha de la carga; vacía usa el momento actual.
    /// Formato RFC3339 o `YYYY-MM-DDTHH:MM`.
    pub date: Option<String>,

    pub quantity: Decimal,

    #[validate(range(min = 0))]
    pub cost: i64,

    #[validate(range(min = 0))]
    pub cargo_mileage: i64,

    pub notes: Option<String>,
}

/// Response de carga de combustible
#[derive(Debug, Serialize)]
pub struct FuelLogResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub station_id: Uuid,
    pub guide_number: i64,
    pub date: String,
    pub quantity: Decimal,
    pub cost: i64,
    pub cargo_mileage: i64,
    pub notes: Option<String>,
    pub author_id: Uuid,
}

impl From<FuelLog> for FuelLogResponse {
    fn from(log: FuelLog) -> Self {
        Self {
            id: log.id,
            unit_id: log.unit_id,
            station_id: log.station_id,
            guide_number: log.guide_number,
            date: log.date.to_rfc3339(),
            quantity: log.quantity,
            cost: log.cost,
            cargo_mileage: log.cargo_mileage,
            notes: log.notes,
            author_id: log.author_id,
        }
    }
}

/// Navegación de meses para los listados mensuales
#[derive(Debug, Serialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

/// Listado mensual de cargas con totales
#[derive(Debug, Serialize)]
pub struct MonthlyFuelResponse {
    pub month_year: String,
    pub logs: Vec<FuelLogResponse>,
    pub quantity_total: Decimal,
    pub cost_total: i64,
    pub prev: MonthRef,
    pub next: MonthRef,
}
