//! Servicio de reportes de checklist
//!
//! Creación transaccional del reporte diario: chequeo de duplicado, alta del
//! reporte y validación e inserción de cada entrada. Cualquier entrada
//! inválida aborta el reporte completo.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::report::{
    should_trigger_alert, validate_answer, NumericAlertRule, Report, ReportEntry,
    ReportItemOption, ReportTemplateItem,
};
use crate::utils::errors::{AppError, AppResult};

/// Respuesta enviada para una pregunta de la plantilla
#[derive(Debug, Clone)]
pub struct SubmittedAnswer {
    pub question_id: Uuid,
    pub answer: String,
    pub comment: Option<String>,
}

/// Entrada que debe llamar la atención, para el correo de alerta
#[derive(Debug, Clone)]
pub struct TriggeredAlert {
    pub question_label: String,
    pub answer: String,
}

pub struct ReportService<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Crea el reporte diario de una unidad con todas sus entradas.
    ///
    /// Falla con conflicto si ya existe un reporte para (unidad, fecha) y
    /// con error de validación si falta una respuesta o alguna no cumple el
    /// tipo de su pregunta. Retorna el reporte y las alertas activadas.
    pub async fn create_report(
        &self,
        unit_id: Uuid,
        author_id: Uuid,
        date: NaiveDate,
        comment: Option<String>,
        answers: &[SubmittedAnswer],
    ) -> AppResult<(Report, Vec<TriggeredAlert>)> {
        // Chequeo explícito de duplicado; la restricción UNIQUE respalda
        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reports WHERE unit_id = $1 AND date = $2)",
        )
        .bind(unit_id)
        .bind(date)
        .fetch_one(self.pool)
        .await?;

        if duplicate {
            return Err(AppError::Conflict(
                "Ya existe un reporte para esta unidad en el día de hoy".to_string(),
            ));
        }

        let template_items = sqlx::query_as::<_, ReportTemplateItem>(
            r#"
            SELECT i.id, i.label, i.question_type, i.category_id
            FROM report_template_items i
            JOIN report_template_item_units iu ON iu.item_id = i.id
            WHERE iu.unit_id = $1
            ORDER BY i.question_type, i.label
            "#,
        )
        .bind(unit_id)
        .fetch_all(self.pool)
        .await?;

        if template_items.is_empty() {
            return Err(AppError::BadRequest(
                "La unidad no tiene preguntas de checklist asignadas".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (id, unit_id, date, author_id, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(unit_id)
        .bind(date)
        .bind(author_id)
        .bind(&comment)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut alerts = Vec::new();

        for item in &template_items {
            let submitted = answers
                .iter()
                .find(|answer| answer.question_id == item.id)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("{}: falta la respuesta", item.label))
                })?;

            let options = sqlx::query_as::<_, ReportItemOption>(
                "SELECT * FROM report_item_options WHERE question_id = $1",
            )
            .bind(item.id)
            .fetch_all(&mut *tx)
            .await?;

            validate_answer(item.question_type, &submitted.answer, &options)
                .map_err(|message| AppError::BadRequest(format!("{}: {}", item.label, message)))?;

            let entry = ReportEntry {
                id: Uuid::new_v4(),
                report_id: report.id,
                question_id: item.id,
                answer: submitted.answer.trim().to_string(),
                comment: submitted.comment.clone(),
            };

            sqlx::query(
                r#"
                INSERT INTO report_entries (id, report_id, question_id, answer, comment)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(entry.id)
            .bind(entry.report_id)
            .bind(entry.question_id)
            .bind(&entry.answer)
            .bind(&entry.comment)
            .execute(&mut *tx)
            .await?;

            let rules = sqlx::query_as::<_, NumericAlertRule>(
                "SELECT * FROM numeric_alert_rules WHERE question_id = $1",
            )
            .bind(item.id)
            .fetch_all(&mut *tx)
            .await?;

            if should_trigger_alert(item.question_type, &submitted.answer, &options, &rules) {
                alerts.push(TriggeredAlert {
                    question_label: item.label.clone(),
                    answer: submitted.answer.trim().to_string(),
                });
            }
        }

        tx.commit().await?;

        tracing::info!(
            "Reporte {} creado para la unidad {} con {} alertas",
            report.id,
            unit_id,
            alerts.len()
        );
        Ok((report, alerts))
    }

    /// Elimina un reporte y sus entradas (borrado físico, como el original)
    pub async fn delete_report(&self, report_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM report_entries WHERE report_id = $1")
            .bind(report_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(report_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Reporte no encontrado".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}
