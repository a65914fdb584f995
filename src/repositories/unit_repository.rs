//! Repositorio de unidades

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::file::StoredFile;
use crate::models::permission::VisibilityScope;
use crate::models::unit::{Unit, UnitDocumentKind};
use crate::utils::errors::{AppError, AppResult};

/// Documentos asociados a una unidad, resueltos a sus archivos
#[derive(Debug, Default)]
pub struct UnitDocuments {
    pub padron: Option<StoredFile>,
    pub soap: Option<StoredFile>,
    pub technical_inspection: Option<StoredFile>,
    pub vehicle_permit: Option<StoredFile>,
}

pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista unidades según el alcance de visibilidad del usuario,
    /// con filtro de búsqueda opcional, ordenadas por número de unidad.
    pub async fn list(
        &self,
        scope: VisibilityScope,
        search: Option<&str>,
    ) -> AppResult<Vec<Unit>> {
        let pattern = search.map(|term| format!("%{}%", term.trim()));

        let units = match scope {
            VisibilityScope::All => {
                sqlx::query_as::<_, Unit>(
                    r#"
                    SELECT * FROM units
                    WHERE NOT deleted
                      AND ($1::text IS NULL OR unit_number ILIKE $1
                           OR description ILIKE $1 OR plate_number ILIKE $1)
                    ORDER BY unit_number
                    "#,
                )
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            VisibilityScope::Entity(entity_id) => {
                sqlx::query_as::<_, Unit>(
                    r#"
                    SELECT * FROM units
                    WHERE NOT deleted AND entity_id = $2
                      AND ($1::text IS NULL OR unit_number ILIKE $1
                           OR description ILIKE $1 OR plate_number ILIKE $1)
                    ORDER BY unit_number
                    "#,
                )
                .bind(pattern)
                .bind(entity_id)
                .fetch_all(&self.pool)
                .await?
            }
            // Las unidades no tienen nivel "propio"
            VisibilityScope::Own(_) | VisibilityScope::None => Vec::new(),
        };

        Ok(units)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>> {
        let unit = sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = $1 AND NOT deleted")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(unit)
    }

    pub async fn unit_number_exists(&self, unit_number: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM units
                WHERE unit_number = $1 AND NOT deleted AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(unit_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn plate_number_exists(&self, plate_number: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM units
                WHERE plate_number = $1 AND NOT deleted AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(plate_number)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, unit: &Unit) -> AppResult<Unit> {
        let created = sqlx::query_as::<_, Unit>(
            r#"
            INSERT INTO units
                (id, unit_number, description, plate_number, entity_id,
                 brand, model, year, vehicle_type, fuel_kind, fuel_tank_capacity,
                 engine_number, chassis_number, tire_size, tire_pressure,
                 state, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(unit.id)
        .bind(&unit.unit_number)
        .bind(&unit.description)
        .bind(&unit.plate_number)
        .bind(unit.entity_id)
        .bind(&unit.brand)
        .bind(&unit.model)
        .bind(unit.year)
        .bind(unit.vehicle_type)
        .bind(unit.fuel_kind)
        .bind(unit.fuel_tank_capacity)
        .bind(&unit.engine_number)
        .bind(&unit.chassis_number)
        .bind(&unit.tire_size)
        .bind(unit.tire_pressure)
        .bind(unit.state)
        .bind(unit.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn update(&self, unit: &Unit) -> AppResult<Unit> {
        let updated = sqlx::query_as::<_, Unit>(
            r#"
            UPDATE units
            SET unit_number = $2, description = $3, plate_number = $4, entity_id = $5,
                brand = $6, model = $7, year = $8, vehicle_type = $9, fuel_kind = $10,
                fuel_tank_capacity = $11, engine_number = $12, chassis_number = $13,
                tire_size = $14, tire_pressure = $15, state = $16
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(unit.id)
        .bind(&unit.unit_number)
        .bind(&unit.description)
        .bind(&unit.plate_number)
        .bind(unit.entity_id)
        .bind(&unit.brand)
        .bind(&unit.model)
        .bind(unit.year)
        .bind(unit.vehicle_type)
        .bind(unit.fuel_kind)
        .bind(unit.fuel_tank_capacity)
        .bind(&unit.engine_number)
        .bind(&unit.chassis_number)
        .bind(&unit.tire_size)
        .bind(unit.tire_pressure)
        .bind(unit.state)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Borrado lógico
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE units SET deleted = true WHERE id = $1 AND NOT deleted")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Unidad no encontrada".to_string()));
        }
        Ok(())
    }

    /// Asocia un documento a la unidad en la columna que corresponde
    pub async fn set_document(
        &self,
        unit_id: Uuid,
        kind: UnitDocumentKind,
        file_id: Uuid,
    ) -> AppResult<()> {
        // La columna sale de un enum cerrado, nunca de entrada del usuario
        let sql = format!(
            "UPDATE units SET {} = $2 WHERE id = $1 AND NOT deleted",
            kind.column()
        );
        let result = sqlx::query(&sql)
            .bind(unit_id)
            .bind(file_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Unidad no encontrada".to_string()));
        }
        Ok(())
    }

    /// Resuelve los cuatro documentos asociados de una unidad
    pub async fn documents(&self, unit: &Unit) -> AppResult<UnitDocuments> {
        let ids: Vec<Uuid> = [
            unit.padron_id,
            unit.soap_id,
            unit.technical_inspection_id,
            unit.vehicle_permit_id,
        ]
        .into_iter()
        .flatten()
        .collect();

        if ids.is_empty() {
            return Ok(UnitDocuments::default());
        }

        let files = sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = ANY($1)")
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        let find = |id: Option<Uuid>| {
            id.and_then(|id| files.iter().find(|file| file.id == id).cloned())
        };

        Ok(UnitDocuments {
            padron: find(unit.padron_id),
            soap: find(unit.soap_id),
            technical_inspection: find(unit.technical_inspection_id),
            vehicle_permit: find(unit.vehicle_permit_id),
        })
    }
}
