//! DTOs de reportes de checklist

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::fuel_dto::MonthRef;
use crate::models::report::{QuestionType, Report};
use crate::repositories::report_repository::EntryWithQuestion;
use crate::utils::calendar::CalendarCell;

/// Respuesta enviada para una pregunta
#[derive(Debug, Deserialize, Serialize)]
pub struct EntryAnswerRequest {
    pub question_id: Uuid,
    pub answer: String,
    pub comment: Option<String>,
}

/// Request para crear el reporte diario de una unidad
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    pub general_comment: Option<String>,

    #[validate(length(min = 1))]
    pub entries: Vec<EntryAnswerRequest>,
}

/// Response de reporte
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub date: NaiveDate,
    pub author_id: Uuid,
    pub comment: Option<String>,
    pub editable: bool,
    pub created_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            unit_id: report.unit_id,
            date: report.date,
            author_id: report.author_id,
            comment: report.comment,
            editable: report.editable,
            created_at: report.created_at.to_rfc3339(),
        }
    }
}

/// Entrada resuelta con la etiqueta de su pregunta
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub question_id: Uuid,
    pub question_label: String,
    pub answer: String,
    pub comment: Option<String>,
}

impl From<EntryWithQuestion> for EntryResponse {
    fn from(entry: EntryWithQuestion) -> Self {
        Self {
            question_id: entry.question_id,
            question_label: entry.question_label,
            answer: entry.answer,
            comment: entry.comment,
        }
    }
}

/// Detalle de reporte con sus entradas
#[derive(Debug, Serialize)]
pub struct ReportDetailResponse {
    #[serde(flatten)]
    pub report: ReportResponse,
    pub entries: Vec<EntryResponse>,
}

/// Opción de una pregunta de opción múltiple
#[derive(Debug, Serialize)]
pub struct TemplateOptionResponse {
    pub id: Uuid,
    pub value: String,
}

/// Pregunta de la plantilla para construir el formulario
#[derive(Debug, Serialize)]
pub struct TemplateItemResponse {
    pub id: Uuid,
    pub label: String,
    pub question_type: QuestionType,
    pub options: Vec<TemplateOptionResponse>,
}

/// Preguntas agrupadas por categoría, ordenadas por tipo
#[derive(Debug, Serialize)]
pub struct TemplateCategoryResponse {
    pub category: String,
    pub items: Vec<TemplateItemResponse>,
}

/// Vista mensual del calendario de reportes de una unidad
#[derive(Debug, Serialize)]
pub struct ReportCalendarResponse {
    pub month_year: String,
    pub cells: Vec<CalendarCell>,
    pub prev: MonthRef,
    pub next: MonthRef,
}
