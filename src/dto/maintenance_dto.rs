//! DTOs del flujo de mantención

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::maintenance_log::{MaintenanceLog, Quotation};

/// Request para crear una solicitud de mantención
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 5, max = 2000))]
    pub description: String,

    /// "bomberos" o "company"
    #[validate(length(min = 1))]
    pub responsible_for_payment: String,

    /// Reporte de checklist que origina la solicitud, si existe
    pub source_report_id: Option<Uuid>,
}

/// Request para editar la descripción de una solicitud
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateMaintenanceRequest {
    #[validate(length(min = 5, max = 2000))]
    pub description: String,
}

/// Evaluación de Comandancia o Administración
#[derive(Debug, Deserialize, Validate)]
pub struct EvaluationRequest {
    /// "accept" o "reject"
    #[validate(length(min = 1))]
    pub decision: String,

    /// Cotización elegida; requerida al aprobar como Comandancia
    pub quotation_id: Option<Uuid>,

    /// Observaciones al aprobar
    pub observations: Option<String>,

    /// Razón del rechazo; requerida al rechazar
    pub reject_reason: Option<String>,
}

/// Datos de cierre de la solicitud
#[derive(Debug, Deserialize, Validate)]
pub struct FinishMaintenanceRequest {
    #[validate(length(min = 1, max = 255))]
    pub workshop_name: String,

    pub dispatch_date: NaiveDate,
    pub return_date: NaiveDate,

    #[validate(range(min = 0))]
    pub cost: i64,

    #[validate(range(min = 0))]
    pub mileage: i64,
}

/// Request para registrar una cotización.
/// El archivo se sube primero por el endpoint de documentos.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    pub file_id: Uuid,

    #[validate(range(min = 0))]
    pub cost: i64,

    pub expiration_date: chrono::DateTime<chrono::Utc>,

    pub comment: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub workshop_name: String,
}

/// Response de solicitud de mantención
#[derive(Debug, Serialize)]
pub struct MaintenanceLogResponse {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub description: String,
    pub responsible_for_payment_id: Uuid,
    pub author_id: Uuid,
    pub creation_date: String,
    pub source_report_id: Option<Uuid>,

    pub approved_by_command: bool,
    pub command_observations: Option<String>,
    pub reviewed_by_command_id: Option<Uuid>,
    pub command_reviewed_date: Option<String>,

    pub approved_by_admin: bool,
    pub admin_observations: Option<String>,
    pub reviewed_by_admin_id: Option<Uuid>,
    pub admin_reviewed_date: Option<String>,

    pub rejection_reason: Option<String>,

    pub workshop_name: Option<String>,
    pub dispatch_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub cost: Option<i64>,
    pub mileage: Option<i64>,
    pub finished_date: Option<String>,

    pub editable: bool,
}

impl From<MaintenanceLog> for MaintenanceLogResponse {
    fn from(log: MaintenanceLog) -> Self {
        Self {
            id: log.id,
            unit_id: log.unit_id,
            description: log.description,
            responsible_for_payment_id: log.responsible_for_payment_id,
            author_id: log.author_id,
            creation_date: log.creation_date.to_rfc3339(),
            source_report_id: log.source_report_id,
            approved_by_command: log.approved_by_command,
            command_observations: log.command_observations,
            reviewed_by_command_id: log.reviewed_by_command_id,
            command_reviewed_date: log.command_reviewed_date.map(|date| date.to_rfc3339()),
            approved_by_admin: log.approved_by_admin,
            admin_observations: log.admin_observations,
            reviewed_by_admin_id: log.reviewed_by_admin_id,
            admin_reviewed_date: log.admin_reviewed_date.map(|date| date.to_rfc3339()),
            rejection_reason: log.rejection_reason,
            workshop_name: log.workshop_name,
            dispatch_date: log.dispatch_date,
            return_date: log.return_date,
            cost: log.cost,
            mileage: log.mileage,
            finished_date: log.finished_date.map(|date| date.to_rfc3339()),
            editable: log.editable,
        }
    }
}

/// Response de cotización
#[derive(Debug, Serialize)]
pub struct QuotationResponse {
    pub id: Uuid,
    pub log_id: Uuid,
    pub file_id: Uuid,
    pub cost: i64,
    pub expiration_date: String,
    pub comment: Option<String>,
    pub workshop_name: String,
    pub author_id: Uuid,
    pub is_favorite: bool,
    pub creation_date: String,
}

impl From<Quotation> for QuotationResponse {
    fn from(quotation: Quotation) -> Self {
        Self {
            id: quotation.id,
            log_id: quotation.log_id,
            file_id: quotation.file_id,
            cost: quotation.cost,
            expiration_date: quotation.expiration_date.to_rfc3339(),
            comment: quotation.comment,
            workshop_name: quotation.workshop_name,
            author_id: quotation.author_id,
            is_favorite: quotation.is_favorite,
            creation_date: quotation.creation_date.to_rfc3339(),
        }
    }
}
