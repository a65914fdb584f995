//! Controller de combustible
//!
//! Estaciones de servicio y registros mensuales de cargas por unidad.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::fuel_dto::{
    CreateFuelLogRequest, CreateStationRequest, FuelLogResponse, MonthRef, MonthlyFuelResponse,
    StationResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::fuel_log::FuelLog;
use crate::repositories::fuel_repository::FuelRepository;
use crate::repositories::unit_repository::UnitRepository;
use crate::services::permission_service;
use crate::utils::calendar::{adjacent_months, MESES_ES};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_datetime;

pub struct FuelController {
    repository: FuelRepository,
    units: UnitRepository,
}

/// Normaliza año y mes de query params a valores sanos
pub fn clamp_year_month(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = Utc::now().date_naive();

    let year = match year {
        Some(year) if (2000..=today.year()).contains(&year) => year,
        _ => today.year(),
    };
    let month = match month {
        Some(month) if (1..=12).contains(&month) => month,
        _ => today.month(),
    };
    (year, month)
}

impl FuelController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FuelRepository::new(pool.clone()),
            units: UnitRepository::new(pool),
        }
    }

    pub async fn list_stations(&self) -> AppResult<Vec<StationResponse>> {
        let stations = self.repository.list_stations().await?;
        Ok(stations.into_iter().map(StationResponse::from).collect())
    }

    pub async fn create_station(
        &self,
        user: &AuthenticatedUser,
        request: CreateStationRequest,
    ) -> AppResult<StationResponse> {
        request.validate()?;

        if !user.is_superuser {
            return Err(AppError::Forbidden(
                "Solo administradores pueden crear estaciones".to_string(),
            ));
        }

        let name = request.name.trim();
        if self.repository.station_name_exists(name).await? {
            return Err(AppError::Conflict(
                "Ya existe una estación con ese nombre".to_string(),
            ));
        }

        let station = self.repository.create_station(name).await?;
        Ok(StationResponse::from(station))
    }

    /// Cargas de una unidad en un mes, con totales y navegación
    pub async fn monthly(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        year: Option<i32>,
        month: Option<u32>,
    ) -> AppResult<MonthlyFuelResponse> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_view_fuel(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver las cargas de esta unidad".to_string(),
            ));
        }

        let (year, month) = clamp_year_month(year, month);
        let logs = self.repository.monthly(unit_id, year, month).await?;

        let quantity_total: Decimal = logs.iter().map(|log| log.quantity).sum();
        let cost_total: i64 = logs.iter().map(|log| log.cost).sum();
        let ((prev_year, prev_month), (next_year, next_month)) = adjacent_months(year, month);

        Ok(MonthlyFuelResponse {
            month_year: format!("{} {}", MESES_ES[(month - 1) as usize], year),
            logs: logs.into_iter().map(FuelLogResponse::from).collect(),
            quantity_total,
            cost_total,
            prev: MonthRef {
                year: prev_year,
                month: prev_month,
            },
            next: MonthRef {
                year: next_year,
                month: next_month,
            },
        })
    }

    pub async fn get_detail(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        fuel_log_id: Uuid,
    ) -> AppResult<FuelLogResponse> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_view_fuel(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver las cargas de esta unidad".to_string(),
            ));
        }

        let log = self
            .repository
            .find_by_id(unit_id, fuel_log_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Registro de combustible no encontrado".to_string()))?;

        Ok(FuelLogResponse::from(log))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        request: CreateFuelLogRequest,
    ) -> AppResult<FuelLogResponse> {
        request.validate()?;

        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_add_fuel(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para registrar cargas en esta unidad".to_string(),
            ));
        }

        if request.quantity <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "La cantidad debe ser mayor que cero".to_string(),
            ));
        }

        let date = match request.date.as_deref().filter(|value| !value.is_empty()) {
            Some(value) => validate_datetime(value)
                .map_err(|_| AppError::BadRequest("Formato de fecha inválido".to_string()))?,
            None => Utc::now(),
        };

        let station = self
            .repository
            .find_station(request.station_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Debes seleccionar una estación de servicio válida".to_string(),
                )
            })?;

        // Chequeo explícito de duplicado; la restricción UNIQUE respalda
        if self
            .repository
            .guide_number_exists(station.id, request.guide_number)
            .await?
        {
            return Err(AppError::Conflict(
                "Ya existe un registro con ese número de guía de esa estación".to_string(),
            ));
        }

        let log = FuelLog {
            id: Uuid::new_v4(),
            unit_id,
            station_id: station.id,
            guide_number: request.guide_number,
            date,
            quantity: request.quantity,
            cost: request.cost,
            cargo_mileage: request.cargo_mileage,
            notes: request.notes,
            author_id: user.user_id,
        };

        let created = self.repository.create(&log).await?;
        tracing::info!(
            "Carga de combustible registrada para la unidad {} por '{}'",
            unit.unit_number,
            user.username
        );
        Ok(FuelLogResponse::from(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_year_month() {
        let today = Utc::now().date_naive();

        assert_eq!(clamp_year_month(Some(2020), Some(5)), (2020, 5));
        // Fuera de rango cae al mes actual
        assert_eq!(clamp_year_month(Some(1990), Some(13)), (today.year(), today.month()));
        assert_eq!(clamp_year_month(None, None), (today.year(), today.month()));
    }
}
