//! Repositorio de solicitudes de mantención y cotizaciones

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::maintenance_log::{MaintenanceLog, Quotation};
use crate::models::permission::VisibilityScope;
use crate::utils::errors::{AppError, AppResult};

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceLog>> {
        let log = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    /// Solicitudes de una unidad, más recientes primero
    pub async fn list_for_unit(&self, unit_id: Uuid) -> AppResult<Vec<MaintenanceLog>> {
        let logs = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT * FROM maintenance_logs
            WHERE unit_id = $1 AND NOT deleted
            ORDER BY creation_date DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    /// Solicitudes visibles para el alcance resuelto del usuario.
    /// El nivel de compañía se decide por la entidad de la unidad.
    pub async fn list_visible(&self, scope: VisibilityScope) -> AppResult<Vec<MaintenanceLog>> {
        let logs = match scope {
            VisibilityScope::All => {
                sqlx::query_as::<_, MaintenanceLog>(
                    r#"
                    SELECT * FROM maintenance_logs
                    WHERE NOT deleted
                    ORDER BY creation_date DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
            VisibilityScope::Entity(entity_id) => {
                sqlx::query_as::<_, MaintenanceLog>(
                    r#"
                    SELECT ml.* FROM maintenance_logs ml
                    JOIN units u ON u.id = ml.unit_id
                    WHERE NOT ml.deleted AND u.entity_id = $1
                    ORDER BY ml.creation_date DESC
                    "#,
                )
                .bind(entity_id)
                .fetch_all(&self.pool)
                .await?
            }
            VisibilityScope::Own(user_id) => {
                sqlx::query_as::<_, MaintenanceLog>(
                    r#"
                    SELECT * FROM maintenance_logs
                    WHERE NOT deleted AND author_id = $1
                    ORDER BY creation_date DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?
            }
            VisibilityScope::None => Vec::new(),
        };
        Ok(logs)
    }

    /// Actualiza la descripción mientras la solicitud siga editable
    pub async fn update_description(&self, id: Uuid, description: &str) -> AppResult<MaintenanceLog> {
        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            UPDATE maintenance_logs
            SET description = $2
            WHERE id = $1 AND NOT deleted AND editable
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("La solicitud no existe o ya no es editable".to_string())
        })?;
        Ok(log)
    }

    /// Borrado lógico
    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE maintenance_logs SET deleted = true WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Solicitud de mantención no encontrada".to_string(),
            ));
        }
        Ok(())
    }

    // ==========================
    // Cotizaciones
    // ==========================

    pub async fn create_quotation(&self, quotation: &Quotation) -> AppResult<Quotation> {
        let created = sqlx::query_as::<_, Quotation>(
            r#"
            INSERT INTO quotations
                (id, log_id, file_id, cost, expiration_date, comment,
                 workshop_name, author_id, creation_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(quotation.id)
        .bind(quotation.log_id)
        .bind(quotation.file_id)
        .bind(quotation.cost)
        .bind(quotation.expiration_date)
        .bind(&quotation.comment)
        .bind(&quotation.workshop_name)
        .bind(quotation.author_id)
        .bind(quotation.creation_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Cotizaciones de una solicitud, más recientes primero
    pub async fn quotations_for_log(&self, log_id: Uuid) -> AppResult<Vec<Quotation>> {
        let quotations = sqlx::query_as::<_, Quotation>(
            r#"
            SELECT * FROM quotations
            WHERE log_id = $1 AND NOT deleted
            ORDER BY creation_date DESC
            "#,
        )
        .bind(log_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(quotations)
    }
}
