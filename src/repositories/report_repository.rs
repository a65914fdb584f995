//! Repositorio de reportes de checklist

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::report::{Report, ReportItemOption};
use crate::utils::calendar::days_in_month;
use crate::utils::errors::AppResult;

/// Pregunta de plantilla junto a la etiqueta de su categoría
#[derive(Debug, sqlx::FromRow)]
pub struct TemplateItemWithCategory {
    pub id: Uuid,
    pub label: String,
    pub question_type: crate::models::report::QuestionType,
    pub category_id: Uuid,
    pub category_label: String,
}

/// Entrada junto a la etiqueta de su pregunta, para detalle y exportación
#[derive(Debug, sqlx::FromRow)]
pub struct EntryWithQuestion {
    pub id: Uuid,
    pub question_id: Uuid,
    pub question_label: String,
    pub answer: String,
    pub comment: Option<String>,
}

pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        let report = sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(report)
    }

    /// Reportes de una unidad dentro de un mes
    pub async fn monthly(&self, unit_id: Uuid, year: i32, month: u32) -> AppResult<Vec<Report>> {
        let from = NaiveDate::from_ymd_opt(year, month, 1).expect("mes válido");
        let to = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .expect("día válido");

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT * FROM reports
            WHERE unit_id = $1 AND date >= $2 AND date <= $3
            ORDER BY date DESC
            "#,
        )
        .bind(unit_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    /// Entradas con la etiqueta de su pregunta, ordenadas por tipo
    pub async fn entries_with_questions(&self, report_id: Uuid) -> AppResult<Vec<EntryWithQuestion>> {
        let entries = sqlx::query_as::<_, EntryWithQuestion>(
            r#"
            SELECT e.id, e.question_id, i.label AS question_label, e.answer, e.comment
            FROM report_entries e
            JOIN report_template_items i ON i.id = e.question_id
            WHERE e.report_id = $1
            ORDER BY i.question_type, i.label
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Preguntas de plantilla asignadas a una unidad, con su categoría
    pub async fn template_items_for_unit(
        &self,
        unit_id: Uuid,
    ) -> AppResult<Vec<TemplateItemWithCategory>> {
        let items = sqlx::query_as::<_, TemplateItemWithCategory>(
            r#"
            SELECT i.id, i.label, i.question_type, i.category_id, c.label AS category_label
            FROM report_template_items i
            JOIN item_categories c ON c.id = i.category_id
            JOIN report_template_item_units iu ON iu.item_id = i.id
            WHERE iu.unit_id = $1
            ORDER BY c.label, i.question_type, i.label
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn options_for_question(&self, question_id: Uuid) -> AppResult<Vec<ReportItemOption>> {
        let options = sqlx::query_as::<_, ReportItemOption>(
            "SELECT * FROM report_item_options WHERE question_id = $1",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(options)
    }
}
