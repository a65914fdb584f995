//! Modelo de solicitudes de mantención
//!
//! Una solicitud avanza por dos aprobaciones independientes (Comandancia y
//! Administración). Un rechazo es terminal: fija `rejection_reason` y bloquea
//! ambas aprobaciones. Solo con ambas aprobaciones y los datos de cierre la
//! solicitud puede finalizar, quedando no editable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Lado que revisa una solicitud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewerRole {
    Command,
    Admin,
}

/// Errores del flujo de aprobación
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("La solicitud fue rechazada y no admite más cambios")]
    AlreadyRejected,

    #[error("La solicitud ya no es editable")]
    NotEditable,

    #[error("Debe indicar la razón del rechazo")]
    EmptyRejectionReason,

    #[error("La solicitud requiere ambas aprobaciones para finalizar")]
    MissingApprovals,

    #[error("Falta el dato de cierre '{0}'")]
    MissingClosingField(&'static str),
}

/// Solicitud de mantención - mapea exactamente a la tabla maintenance_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceLog {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub description: String,
    /// Entidad responsable del pago (administración o compañía de la unidad)
    pub responsible_for_payment_id: Uuid,
    pub author_id: Uuid,
    pub creation_date: DateTime<Utc>,

    /// Reporte de checklist que originó la solicitud, si existe
    pub source_report_id: Option<Uuid>,

    // Revisión de Comandancia
    pub approved_by_command: bool,
    pub command_observations: Option<String>,
    pub reviewed_by_command_id: Option<Uuid>,
    pub command_reviewed_date: Option<DateTime<Utc>>,

    // Revisión de Administración
    pub approved_by_admin: bool,
    pub admin_observations: Option<String>,
    pub reviewed_by_admin_id: Option<Uuid>,
    pub admin_reviewed_date: Option<DateTime<Utc>>,

    /// Razón de rechazo. Una vez fijada, la solicitud queda terminal.
    pub rejection_reason: Option<String>,

    // Datos de cierre
    pub workshop_name: Option<String>,
    pub dispatch_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub cost: Option<i64>,
    pub mileage: Option<i64>,
    pub finished_date: Option<DateTime<Utc>>,

    // Auditoría
    pub editable: bool,
    pub deleted: bool,
}

/// Datos de cierre requeridos para finalizar una solicitud
#[derive(Debug, Clone)]
pub struct ClosingData {
    pub workshop_name: String,
    pub dispatch_date: NaiveDate,
    pub return_date: NaiveDate,
    pub cost: i64,
    pub mileage: i64,
}

impl MaintenanceLog {
    pub fn is_rejected(&self) -> bool {
        self.rejection_reason
            .as_deref()
            .map_or(false, |reason| !reason.trim().is_empty())
    }

    pub fn is_finished(&self) -> bool {
        self.finished_date.is_some()
    }

    fn ensure_open(&self) -> Result<(), WorkflowError> {
        if self.is_rejected() {
            return Err(WorkflowError::AlreadyRejected);
        }
        if !self.editable {
            return Err(WorkflowError::NotEditable);
        }
        Ok(())
    }

    /// Aprueba la solicitud desde uno de los lados revisores.
    /// Las aprobaciones son interruptores independientes, no una secuencia.
    pub fn approve(
        &mut self,
        role: ReviewerRole,
        reviewer_id: Uuid,
        observations: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_open()?;

        match role {
            ReviewerRole::Command => {
                self.approved_by_command = true;
                self.command_observations = observations;
                self.reviewed_by_command_id = Some(reviewer_id);
                self.command_reviewed_date = Some(now);
            }
            ReviewerRole::Admin => {
                self.approved_by_admin = true;
                self.admin_observations = observations;
                self.reviewed_by_admin_id = Some(reviewer_id);
                self.admin_reviewed_date = Some(now);
            }
        }
        Ok(())
    }

    /// Rechaza la solicitud. El rechazo es terminal sin importar qué lado
    /// lo emite.
    pub fn reject(
        &mut self,
        role: ReviewerRole,
        reviewer_id: Uuid,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        self.ensure_open()?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(WorkflowError::EmptyRejectionReason);
        }

        match role {
            ReviewerRole::Command => {
                self.approved_by_command = false;
                self.reviewed_by_command_id = Some(reviewer_id);
                self.command_reviewed_date = Some(now);
            }
            ReviewerRole::Admin => {
                self.approved_by_admin = false;
                self.reviewed_by_admin_id = Some(reviewer_id);
                self.admin_reviewed_date = Some(now);
            }
        }
        self.rejection_reason = Some(reason.to_string());
        Ok(())
    }

    /// Finaliza la solicitud. Requiere ambas aprobaciones y todos los datos
    /// de cierre; deja la solicitud no editable.
    pub fn finish(&mut self, closing: ClosingData, now: DateTime<Utc>) -> Result<(), WorkflowError> {
        self.ensure_open()?;

        if !(self.approved_by_command && self.approved_by_admin) {
            return Err(WorkflowError::MissingApprovals);
        }
        if closing.workshop_name.trim().is_empty() {
            return Err(WorkflowError::MissingClosingField("workshop_name"));
        }

        self.workshop_name = Some(closing.workshop_name);
        self.dispatch_date = Some(closing.dispatch_date);
        self.return_date = Some(closing.return_date);
        self.cost = Some(closing.cost);
        self.mileage = Some(closing.mileage);
        self.finished_date = Some(now);
        self.editable = false;
        Ok(())
    }
}

/// Cotización - mapea exactamente a la tabla quotations
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quotation {
    pub id: Uuid,
    pub log_id: Uuid,
    pub file_id: Uuid,
    pub cost: i64,
    pub expiration_date: DateTime<Utc>,
    pub comment: Option<String>,
    pub workshop_name: String,
    pub author_id: Uuid,
    pub is_favorite: bool,
    pub creation_date: DateTime<Utc>,
    pub editable: bool,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_log() -> MaintenanceLog {
        MaintenanceLog {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            description: "Cambio de frenos".to_string(),
            responsible_for_payment_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            creation_date: Utc::now(),
            source_report_id: None,
            approved_by_command: false,
            command_observations: None,
            reviewed_by_command_id: None,
            command_reviewed_date: None,
            approved_by_admin: false,
            admin_observations: None,
            reviewed_by_admin_id: None,
            admin_reviewed_date: None,
            rejection_reason: None,
            workshop_name: None,
            dispatch_date: None,
            return_date: None,
            cost: None,
            mileage: None,
            finished_date: None,
            editable: true,
            deleted: false,
        }
    }

    fn closing() -> ClosingData {
        ClosingData {
            workshop_name: "Taller Pérez".to_string(),
            dispatch_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            cost: 450_000,
            mileage: 123_456,
        }
    }

    #[test]
    fn test_approvals_are_independent_toggles() {
        let mut log = new_log();
        let reviewer = Uuid::new_v4();
        let now = Utc::now();

        // Administración puede aprobar antes que Comandancia
        log.approve(ReviewerRole::Admin, reviewer, None, now).unwrap();
        assert!(log.approved_by_admin);
        assert!(!log.approved_by_command);

        log.approve(ReviewerRole::Command, reviewer, Some("ok".to_string()), now)
            .unwrap();
        assert!(log.approved_by_command);
    }

    #[test]
    fn test_rejection_is_terminal_for_both_sides() {
        let mut log = new_log();
        let reviewer = Uuid::new_v4();
        let now = Utc::now();

        log.reject(ReviewerRole::Command, reviewer, "Sin presupuesto", now)
            .unwrap();
        assert!(log.is_rejected());

        // Ninguna aprobación puede fijarse después del rechazo
        assert_eq!(
            log.approve(ReviewerRole::Admin, reviewer, None, now),
            Err(WorkflowError::AlreadyRejected)
        );
        assert_eq!(
            log.approve(ReviewerRole::Command, reviewer, None, now),
            Err(WorkflowError::AlreadyRejected)
        );
        // Tampoco puede finalizar
        assert_eq!(log.finish(closing(), now), Err(WorkflowError::AlreadyRejected));
    }

    #[test]
    fn test_reject_requires_reason() {
        let mut log = new_log();
        assert_eq!(
            log.reject(ReviewerRole::Admin, Uuid::new_v4(), "   ", Utc::now()),
            Err(WorkflowError::EmptyRejectionReason)
        );
        assert!(!log.is_rejected());
    }

    #[test]
    fn test_finish_requires_both_approvals() {
        let mut log = new_log();
        let reviewer = Uuid::new_v4();
        let now = Utc::now();

        assert_eq!(log.finish(closing(), now), Err(WorkflowError::MissingApprovals));

        log.approve(ReviewerRole::Command, reviewer, None, now).unwrap();
        assert_eq!(log.finish(closing(), now), Err(WorkflowError::MissingApprovals));

        log.approve(ReviewerRole::Admin, reviewer, None, now).unwrap();
        log.finish(closing(), now).unwrap();

        assert!(log.is_finished());
        assert!(!log.editable);
    }

    #[test]
    fn test_finish_requires_closing_fields() {
        let mut log = new_log();
        let reviewer = Uuid::new_v4();
        let now = Utc::now();
        log.approve(ReviewerRole::Command, reviewer, None, now).unwrap();
        log.approve(ReviewerRole::Admin, reviewer, None, now).unwrap();

        let mut incomplete = closing();
        incomplete.workshop_name = "  ".to_string();
        assert_eq!(
            log.finish(incomplete, now),
            Err(WorkflowError::MissingClosingField("workshop_name"))
        );
        assert!(!log.is_finished());
    }

    #[test]
    fn test_finished_log_is_frozen() {
        let mut log = new_log();
        let reviewer = Uuid::new_v4();
        let now = Utc::now();
        log.approve(ReviewerRole::Command, reviewer, None, now).unwrap();
        log.approve(ReviewerRole::Admin, reviewer, None, now).unwrap();
        log.finish(closing(), now).unwrap();

        assert_eq!(
            log.approve(ReviewerRole::Command, reviewer, None, now),
            Err(WorkflowError::NotEditable)
        );
        assert_eq!(
            log.reject(ReviewerRole::Admin, reviewer, "tarde", now),
            Err(WorkflowError::NotEditable)
        );
    }
}
