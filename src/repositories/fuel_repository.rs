//! Repositorio de combustible

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::fuel_log::{FuelLog, Station};
use crate::utils::calendar::days_in_month;
use crate::utils::errors::AppResult;

pub struct FuelRepository {
    pool: PgPool,
}

impl FuelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_stations(&self) -> AppResult<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>("SELECT * FROM stations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(stations)
    }

    pub async fn find_station(&self, id: Uuid) -> AppResult<Option<Station>> {
        let station = sqlx::query_as::<_, Station>("SELECT * FROM stations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(station)
    }

    pub async fn station_name_exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM stations WHERE name = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn create_station(&self, name: &str) -> AppResult<Station> {
        let station = sqlx::query_as::<_, Station>(
            "INSERT INTO stations (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(station)
    }

    /// Chequeo explícito del par (estación, número de guía);
    /// la restricción UNIQUE respalda
    pub async fn guide_number_exists(&self, station_id: Uuid, guide_number: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM fuel_logs WHERE station_id = $1 AND guide_number = $2)",
        )
        .bind(station_id)
        .bind(guide_number)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, log: &FuelLog) -> AppResult<FuelLog> {
        let created = sqlx::query_as::<_, FuelLog>(
            r#"
            INSERT INTO fuel_logs
                (id, unit_id, station_id, guide_number, date, quantity, cost,
                 cargo_mileage, notes, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.unit_id)
        .bind(log.station_id)
        .bind(log.guide_number)
        .bind(log.date)
        .bind(log.quantity)
        .bind(log.cost)
        .bind(log.cargo_mileage)
        .bind(&log.notes)
        .bind(log.author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, unit_id: Uuid, id: Uuid) -> AppResult<Option<FuelLog>> {
        let log = sqlx::query_as::<_, FuelLog>(
            "SELECT * FROM fuel_logs WHERE id = $1 AND unit_id = $2",
        )
        .bind(id)
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    /// Cargas de una unidad en un mes, más recientes primero
    pub async fn monthly(&self, unit_id: Uuid, year: i32, month: u32) -> AppResult<Vec<FuelLog>> {
        let (from, to) = month_bounds(year, month);

        let logs = sqlx::query_as::<_, FuelLog>(
            r#"
            SELECT * FROM fuel_logs
            WHERE unit_id = $1 AND date >= $2 AND date < $3
            ORDER BY date DESC
            "#,
        )
        .bind(unit_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}

/// Límites [inicio, fin) de un mes en UTC
fn month_bounds(year: i32, month: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("mes válido")
        .and_hms_opt(0, 0, 0)
        .expect("hora válida")
        .and_utc();
    let last_day = days_in_month(year, month);
    let next = NaiveDate::from_ymd_opt(year, month, last_day)
        .expect("día válido")
        .succ_opt()
        .expect("fecha válida")
        .and_hms_opt(0, 0, 0)
        .expect("hora válida")
        .and_utc();
    (first, next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let (from, to) = month_bounds(2025, 12);
        assert_eq!(from.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(to.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }
}
