//! Controller de reportes de checklist
//!
//! Calendario mensual, creación transaccional del reporte diario, detalle,
//! eliminación y exportación imprimible.

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::controllers::fuel_controller::clamp_year_month;
use crate::dto::fuel_dto::MonthRef;
use crate::dto::report_dto::{
    CreateReportRequest, EntryResponse, ReportCalendarResponse, ReportDetailResponse,
    ReportResponse, TemplateCategoryResponse, TemplateItemResponse, TemplateOptionResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::unit::Unit;
use crate::repositories::report_repository::ReportRepository;
use crate::repositories::unit_repository::UnitRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::export_service::{render_report_document, PrintableEntry};
use crate::services::notification_service::NotificationService;
use crate::services::permission_service;
use crate::services::report_service::{ReportService, SubmittedAnswer};
use crate::utils::calendar::{adjacent_months, month_cells, MESES_ES};
use crate::utils::errors::{AppError, AppResult};

pub struct ReportController {
    pool: PgPool,
    repository: ReportRepository,
    units: UnitRepository,
    users: UserRepository,
}

impl ReportController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ReportRepository::new(pool.clone()),
            units: UnitRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    async fn viewable_unit(&self, user: &AuthenticatedUser, unit_id: Uuid) -> AppResult<Unit> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_view_report(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver los reportes de esta unidad".to_string(),
            ));
        }
        Ok(unit)
    }

    /// Calendario mensual de reportes de una unidad
    pub async fn calendar(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        year: Option<i32>,
        month: Option<u32>,
    ) -> AppResult<ReportCalendarResponse> {
        self.viewable_unit(user, unit_id).await?;

        let (year, month) = clamp_year_month(year, month);
        let reports = self.repository.monthly(unit_id, year, month).await?;

        let reports_by_day: HashMap<u32, Uuid> = reports
            .iter()
            .map(|report| (report.date.day(), report.id))
            .collect();

        let today = Utc::now().date_naive();
        let cells = month_cells(year, month, today, &reports_by_day);
        let ((prev_year, prev_month), (next_year, next_month)) = adjacent_months(year, month);

        Ok(ReportCalendarResponse {
            month_year: format!("{} {}", MESES_ES[(month - 1) as usize], year),
            cells,
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

    /// Preguntas de la plantilla agrupadas por categoría, para el formulario
    pub async fn template_items(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
    ) -> AppResult<Vec<TemplateCategoryResponse>> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_add_report(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para crear reportes en esta unidad".to_string(),
            ));
        }

        let items = self.repository.template_items_for_unit(unit_id).await?;

        let mut grouped: Vec<TemplateCategoryResponse> = Vec::new();
        for item in items {
            let options = self
                .repository
                .options_for_question(item.id)
                .await?
                .into_iter()
                .map(|option| TemplateOptionResponse {
                    id: option.id,
                    value: option.value,
                })
                .collect();

            let response = TemplateItemResponse {
                id: item.id,
                label: item.label,
                question_type: item.question_type,
                options,
            };

            match grouped
                .iter_mut()
                .find(|group| group.category == item.category_label)
            {
                Some(group) => group.items.push(response),
                None => grouped.push(TemplateCategoryResponse {
                    category: item.category_label,
                    items: vec![response],
                }),
            }
        }

        Ok(grouped)
    }

    /// Crea el reporte del día para una unidad y dispara las alertas
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        request: CreateReportRequest,
        notifications: &NotificationService,
    ) -> AppResult<ReportResponse> {
        request.validate()?;

        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_add_report(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para crear reportes en esta unidad".to_string(),
            ));
        }

        let answers: Vec<SubmittedAnswer> = request
            .entries
            .iter()
            .map(|entry| SubmittedAnswer {
                question_id: entry.question_id,
                answer: entry.answer.clone(),
                comment: entry.comment.clone(),
            })
            .collect();

        let today = Utc::now().date_naive();
        let service = ReportService::new(&self.pool);
        let (report, alerts) = service
            .create_report(
                unit_id,
                user.user_id,
                today,
                request.general_comment,
                &answers,
            )
            .await?;

        // Alertas por correo, de mejor esfuerzo tras el commit
        if !alerts.is_empty() {
            let pairs: Vec<(String, String)> = alerts
                .iter()
                .map(|alert| (alert.question_label.clone(), alert.answer.clone()))
                .collect();

            match self.users.expiration_recipients().await {
                Ok(recipients) => {
                    for recipient in recipients {
                        if let Some(email) = &recipient.email {
                            notifications.send_report_alert(
                                email,
                                &unit.unit_number,
                                report.date,
                                &pairs,
                            );
                        }
                    }
                }
                Err(e) => tracing::warn!("No se pudieron cargar destinatarios de alertas: {}", e),
            }
        }

        Ok(ReportResponse::from(report))
    }

    pub async fn get_detail(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        report_id: Uuid,
    ) -> AppResult<ReportDetailResponse> {
        self.viewable_unit(user, unit_id).await?;

        let report = self
            .repository
            .find_by_id(report_id)
            .await?
            .filter(|report| report.unit_id == unit_id)
            .ok_or_else(|| AppError::NotFound("Reporte no encontrado".to_string()))?;

        let entries = self
            .repository
            .entries_with_questions(report.id)
            .await?
            .into_iter()
            .map(EntryResponse::from)
            .collect();

        Ok(ReportDetailResponse {
            report: ReportResponse::from(report),
            entries,
        })
    }

    pub async fn delete(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        report_id: Uuid,
    ) -> AppResult<()> {
        let unit = self
            .units
            .find_by_id(unit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Unidad no encontrada".to_string()))?;

        if !permission_service::can_delete_report(user, unit.entity_id) {
            return Err(AppError::Forbidden(
                "No tienes permiso para eliminar reportes de esta unidad".to_string(),
            ));
        }

        self.repository
            .find_by_id(report_id)
            .await?
            .filter(|report| report.unit_id == unit_id)
            .ok_or_else(|| AppError::NotFound("Reporte no encontrado".to_string()))?;

        let service = ReportService::new(&self.pool);
        service.delete_report(report_id).await
    }

    /// Documento imprimible del reporte
    pub async fn export(
        &self,
        user: &AuthenticatedUser,
        unit_id: Uuid,
        report_id: Uuid,
    ) -> AppResult<(String, String)> {
        let unit = self.viewable_unit(user, unit_id).await?;

        let report = self
            .repository
            .find_by_id(report_id)
            .await?
            .filter(|report| report.unit_id == unit_id)
            .ok_or_else(|| AppError::NotFound("Reporte no encontrado".to_string()))?;

        let author_name = self
            .users
            .find_by_id(report.author_id)
            .await?
            .map(|author| author.full_name)
            .unwrap_or_else(|| "Desconocido".to_string());

        let entries: Vec<PrintableEntry> = self
            .repository
            .entries_with_questions(report.id)
            .await?
            .into_iter()
            .map(|entry| PrintableEntry {
                question_label: entry.question_label,
                answer: entry.answer,
                comment: entry.comment,
            })
            .collect();

        let html = render_report_document(
            &unit.unit_number,
            &unit.description,
            report.date,
            &author_name,
            report.comment.as_deref(),
            &entries,
        );

        let filename = format!("reporte_{}_{}.html", unit.unit_number, report.date);
        Ok((filename, html))
    }
}
