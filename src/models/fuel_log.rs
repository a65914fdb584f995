//! Modelo de registros de combustible
//!
//! Cada carga queda asociada a una unidad y una estación de servicio.
//! El par (estación, número de guía) es único.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estación de servicio
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Station {
    pub id: Uuid,
    pub name: String,
}

/// Registro de carga de combustible - mapea exactamente a la tabla fuel_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelLog {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub station_id: Uuid,
    /// Número de guía de la estación; único por estación
    pub guide_number: i64,
    pub date: DateTime<Utc>,
    /// Litros cargados
    pub quantity: Decimal,
    /// Costo en pesos
    pub cost: i64,
    /// Kilometraje al momento de la carga
    pub cargo_mileage: i64,
    pub notes: Option<String>,
    pub author_id: Uuid,
}
