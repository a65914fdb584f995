//! Servicio del flujo de mantención
//!
//! Orquesta la creación de solicitudes, las evaluaciones de Comandancia y
//! Administración y el cierre. Los guardas del estado viven en el modelo;
//! aquí se cargan y persisten las filas dentro de transacciones.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::maintenance_log::{ClosingData, MaintenanceLog, ReviewerRole, WorkflowError};
use crate::models::organization::EntityType;
use crate::utils::errors::{AppError, AppResult};

/// Responsable del pago elegido en el formulario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentResponsible {
    /// El Cuerpo de Bomberos (entidad de administración)
    Brigade,
    /// La compañía del autor
    Company,
}

impl PaymentResponsible {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "bomberos" => Some(PaymentResponsible::Brigade),
            "company" => Some(PaymentResponsible::Company),
            _ => None,
        }
    }
}

fn workflow_error(error: WorkflowError) -> AppError {
    match error {
        WorkflowError::AlreadyRejected | WorkflowError::NotEditable => {
            AppError::Conflict(error.to_string())
        }
        _ => AppError::BadRequest(error.to_string()),
    }
}

pub struct MaintenanceService<'a> {
    pool: &'a PgPool,
}

impl<'a> MaintenanceService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Crea una solicitud de mantención para una unidad.
    ///
    /// Si la solicitud nace de un reporte de checklist, la fila del reporte
    /// se lee `FOR UPDATE` dentro de la transacción: un mismo reporte no
    /// puede originar dos solicitudes.
    pub async fn create_request(
        &self,
        unit_id: Uuid,
        author_id: Uuid,
        author_entity_id: Option<Uuid>,
        description: &str,
        responsible: PaymentResponsible,
        source_report_id: Option<Uuid>,
    ) -> AppResult<MaintenanceLog> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::BadRequest("La descripción es obligatoria".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let payment_entity_id: Uuid = match responsible {
            PaymentResponsible::Brigade => sqlx::query_scalar(
                "SELECT id FROM entities WHERE entity_type = $1 LIMIT 1",
            )
            .bind(EntityType::Admin)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::Internal("No existe la entidad de administración".to_string())
            })?,
            PaymentResponsible::Company => author_entity_id.ok_or_else(|| {
                AppError::BadRequest(
                    "El usuario no tiene compañía asignada para asumir el pago".to_string(),
                )
            })?,
        };

        if let Some(report_id) = source_report_id {
            // Bloquea la fila del reporte hasta el commit
            let report_exists: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM reports WHERE id = $1 AND unit_id = $2 FOR UPDATE",
            )
            .bind(report_id)
            .bind(unit_id)
            .fetch_optional(&mut *tx)
            .await?;

            if report_exists.is_none() {
                return Err(AppError::NotFound("Reporte no encontrado".to_string()));
            }

            let already_consumed: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM maintenance_logs
                    WHERE source_report_id = $1 AND NOT deleted
                )
                "#,
            )
            .bind(report_id)
            .fetch_one(&mut *tx)
            .await?;

            if already_consumed {
                return Err(AppError::Conflict(
                    "El reporte ya originó una solicitud de mantención".to_string(),
                ));
            }
        }

        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs
                (id, unit_id, description, responsible_for_payment_id, author_id,
                 creation_date, source_report_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(unit_id)
        .bind(description)
        .bind(payment_entity_id)
        .bind(author_id)
        .bind(Utc::now())
        .bind(source_report_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Solicitud de mantención {} creada para la unidad {}",
            log.id,
            unit_id
        );
        Ok(log)
    }

    /// Aprueba la solicitud desde uno de los lados revisores.
    ///
    /// Al aprobar como Comandancia se marca la cotización elegida como
    /// favorita, desmarcando las demás.
    pub async fn approve(
        &self,
        log_id: Uuid,
        role: ReviewerRole,
        reviewer_id: Uuid,
        observations: Option<String>,
        favorite_quotation_id: Option<Uuid>,
    ) -> AppResult<MaintenanceLog> {
        let mut tx = self.pool.begin().await?;

        let mut log = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE id = $1 AND NOT deleted FOR UPDATE",
        )
        .bind(log_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Solicitud de mantención no encontrada".to_string()))?;

        if role == ReviewerRole::Command {
            let quotation_id = favorite_quotation_id.ok_or_else(|| {
                AppError::BadRequest(
                    "Debe seleccionar una cotización para aprobar".to_string(),
                )
            })?;

            let belongs: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM quotations WHERE id = $1 AND log_id = $2 AND NOT deleted)",
            )
            .bind(quotation_id)
            .bind(log_id)
            .fetch_one(&mut *tx)
            .await?;
            if !belongs {
                return Err(AppError::NotFound("Cotización no encontrada".to_string()));
            }

            sqlx::query("UPDATE quotations SET is_favorite = false WHERE log_id = $1")
                .bind(log_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("UPDATE quotations SET is_favorite = true WHERE id = $1")
                .bind(quotation_id)
                .execute(&mut *tx)
                .await?;
        }

        log.approve(role, reviewer_id, observations, Utc::now())
            .map_err(workflow_error)?;

        let log = Self::persist_review(&mut tx, &log).await?;
        tx.commit().await?;
        Ok(log)
    }

    /// Rechaza la solicitud. El rechazo es terminal.
    pub async fn reject(
        &self,
        log_id: Uuid,
        role: ReviewerRole,
        reviewer_id: Uuid,
        reason: &str,
    ) -> AppResult<MaintenanceLog> {
        let mut tx = self.pool.begin().await?;

        let mut log = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE id = $1 AND NOT deleted FOR UPDATE",
        )
        .bind(log_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Solicitud de mantención no encontrada".to_string()))?;

        log.reject(role, reviewer_id, reason, Utc::now())
            .map_err(workflow_error)?;

        let log = Self::persist_review(&mut tx, &log).await?;
        tx.commit().await?;
        Ok(log)
    }

    /// Finaliza la solicitud con los datos de cierre; queda no editable
    pub async fn finish(&self, log_id: Uuid, closing: ClosingData) -> AppResult<MaintenanceLog> {
        let mut tx = self.pool.begin().await?;

        let mut log = sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE id = $1 AND NOT deleted FOR UPDATE",
        )
        .bind(log_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Solicitud de mantención no encontrada".to_string()))?;

        log.finish(closing, Utc::now()).map_err(workflow_error)?;

        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            UPDATE maintenance_logs
            SET workshop_name = $2, dispatch_date = $3, return_date = $4,
                cost = $5, mileage = $6, finished_date = $7, editable = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(&log.workshop_name)
        .bind(log.dispatch_date)
        .bind(log.return_date)
        .bind(log.cost)
        .bind(log.mileage)
        .bind(log.finished_date)
        .bind(log.editable)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Solicitud de mantención {} finalizada", log.id);
        Ok(log)
    }

    async fn persist_review(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        log: &MaintenanceLog,
    ) -> AppResult<MaintenanceLog> {
        let updated = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            UPDATE maintenance_logs
            SET approved_by_command = $2, command_observations = $3,
                reviewed_by_command_id = $4, command_reviewed_date = $5,
                approved_by_admin = $6, admin_observations = $7,
                reviewed_by_admin_id = $8, admin_reviewed_date = $9,
                rejection_reason = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(log.id)
        .bind(log.approved_by_command)
        .bind(&log.command_observations)
        .bind(log.reviewed_by_command_id)
        .bind(log.command_reviewed_date)
        .bind(log.approved_by_admin)
        .bind(&log.admin_observations)
        .bind(log.reviewed_by_admin_id)
        .bind(log.admin_reviewed_date)
        .bind(&log.rejection_reason)
        .fetch_one(&mut **tx)
        .await?;
        Ok(updated)
    }
}
