//! Permisos tipados del sistema
//!
//! Reemplaza los codenames dinámicos (`"app.codename"`) por un enum tipado.
//! Cada permiso se persiste en la base de datos con su codename textual.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Permiso del sistema.
///
/// Los permisos de unidad, mantención, combustible y reportes existen en
/// hasta tres niveles: global, de compañía (entidad propia) y propio
/// (registros creados por el usuario).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Entidades
    ViewEntity,
    ViewOwnEntity,

    // Unidades
    ViewUnit,
    AddUnit,
    ChangeUnit,
    DeleteUnit,
    ViewCompanyUnit,
    AddCompanyUnit,
    ChangeCompanyUnit,
    DeleteCompanyUnit,

    // Solicitudes de mantención
    ViewMaintenance,
    ChangeMaintenance,
    DeleteMaintenance,
    ViewCompanyMaintenance,
    ChangeCompanyMaintenance,
    DeleteCompanyMaintenance,
    ViewOwnMaintenance,
    ChangeOwnMaintenance,
    DeleteOwnMaintenance,
    AddMaintenance,
    ApproveMaintenanceAsCommand,
    ApproveMaintenanceAsAdmin,
    FinishMaintenance,

    // Registros de combustible
    ViewFuelLog,
    AddFuelLog,
    ViewCompanyFuelLog,
    AddCompanyFuelLog,

    // Reportes de checklist
    ViewReport,
    AddReport,
    DeleteReport,
    ViewCompanyReport,
    AddCompanyReport,
    DeleteCompanyReport,
}

impl Permission {
    /// Codename con el que se persiste el permiso
    pub fn as_codename(&self) -> &'static str {
        match self {
            Permission::ViewEntity => "view_entity",
            Permission::ViewOwnEntity => "view_own_entity",
            Permission::ViewUnit => "view_unit",
            Permission::AddUnit => "add_unit",
            Permission::ChangeUnit => "change_unit",
            Permission::DeleteUnit => "delete_unit",
            Permission::ViewCompanyUnit => "view_company_unit",
            Permission::AddCompanyUnit => "add_company_unit",
            Permission::ChangeCompanyUnit => "change_company_unit",
            Permission::DeleteCompanyUnit => "delete_company_unit",
            Permission::ViewMaintenance => "view_maintenance",
            Permission::ChangeMaintenance => "change_maintenance",
            Permission::DeleteMaintenance => "delete_maintenance",
            Permission::ViewCompanyMaintenance => "view_company_maintenance",
            Permission::ChangeCompanyMaintenance => "change_company_maintenance",
            Permission::DeleteCompanyMaintenance => "delete_company_maintenance",
            Permission::ViewOwnMaintenance => "view_own_maintenance",
            Permission::ChangeOwnMaintenance => "change_own_maintenance",
            Permission::DeleteOwnMaintenance => "delete_own_maintenance",
            Permission::AddMaintenance => "add_maintenance",
            Permission::ApproveMaintenanceAsCommand => "approve_maintenance_as_command",
            Permission::ApproveMaintenanceAsAdmin => "approve_maintenance_as_admin",
            Permission::FinishMaintenance => "finish_maintenance",
            Permission::ViewFuelLog => "view_fuel_log",
            Permission::AddFuelLog => "add_fuel_log",
            Permission::ViewCompanyFuelLog => "view_company_fuel_log",
            Permission::AddCompanyFuelLog => "add_company_fuel_log",
            Permission::ViewReport => "view_report",
            Permission::AddReport => "add_report",
            Permission::DeleteReport => "delete_report",
            Permission::ViewCompanyReport => "view_company_report",
            Permission::AddCompanyReport => "add_company_report",
            Permission::DeleteCompanyReport => "delete_company_report",
        }
    }

    /// Parsea un codename almacenado. Codenames desconocidos retornan `None`.
    pub fn from_codename(codename: &str) -> Option<Self> {
        let permission = match codename {
            "view_entity" => Permission::ViewEntity,
            "view_own_entity" => Permission::ViewOwnEntity,
            "view_unit" => Permission::ViewUnit,
            "add_unit" => Permission::AddUnit,
            "change_unit" => Permission::ChangeUnit,
            "delete_unit" => Permission::DeleteUnit,
            "view_company_unit" => Permission::ViewCompanyUnit,
            "add_company_unit" => Permission::AddCompanyUnit,
            "change_company_unit" => Permission::ChangeCompanyUnit,
            "delete_company_unit" => Permission::DeleteCompanyUnit,
            "view_maintenance" => Permission::ViewMaintenance,
            "change_maintenance" => Permission::ChangeMaintenance,
            "delete_maintenance" => Permission::DeleteMaintenance,
            "view_company_maintenance" => Permission::ViewCompanyMaintenance,
            "change_company_maintenance" => Permission::ChangeCompanyMaintenance,
            "delete_company_maintenance" => Permission::DeleteCompanyMaintenance,
            "view_own_maintenance" => Permission::ViewOwnMaintenance,
            "change_own_maintenance" => Permission::ChangeOwnMaintenance,
            "delete_own_maintenance" => Permission::DeleteOwnMaintenance,
            "add_maintenance" => Permission::AddMaintenance,
            "approve_maintenance_as_command" => Permission::ApproveMaintenanceAsCommand,
            "approve_maintenance_as_admin" => Permission::ApproveMaintenanceAsAdmin,
            "finish_maintenance" => Permission::FinishMaintenance,
            "view_fuel_log" => Permission::ViewFuelLog,
            "add_fuel_log" => Permission::AddFuelLog,
            "view_company_fuel_log" => Permission::ViewCompanyFuelLog,
            "add_company_fuel_log" => Permission::AddCompanyFuelLog,
            "view_report" => Permission::ViewReport,
            "add_report" => Permission::AddReport,
            "delete_report" => Permission::DeleteReport,
            "view_company_report" => Permission::ViewCompanyReport,
            "add_company_report" => Permission::AddCompanyReport,
            "delete_company_report" => Permission::DeleteCompanyReport,
            _ => return None,
        };
        Some(permission)
    }
}

/// Conjunto de permisos efectivos de un usuario
pub type PermissionSet = HashSet<Permission>;

/// Convierte codenames persistidos a un `PermissionSet`.
/// Los codenames desconocidos se descartan con un warning.
pub fn parse_codenames(codenames: &[String]) -> PermissionSet {
    codenames
        .iter()
        .filter_map(|codename| {
            let parsed = Permission::from_codename(codename);
            if parsed.is_none() {
                tracing::warn!("Codename de permiso desconocido: '{}'", codename);
            }
            parsed
        })
        .collect()
}

/// Alcance de visibilidad resuelto para un usuario sobre un dominio.
///
/// Los niveles se evalúan en orden de prioridad (global, compañía, propio);
/// gana el primero que aplica y nunca se combinan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    /// Todos los registros
    All,
    /// Solo registros de la entidad indicada
    Entity(Uuid),
    /// Solo registros creados por el usuario indicado
    Own(Uuid),
    /// Ningún registro
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codename_round_trip() {
        let all = [
            Permission::ViewEntity,
            Permission::ViewCompanyUnit,
            Permission::ViewOwnMaintenance,
            Permission::ApproveMaintenanceAsCommand,
            Permission::FinishMaintenance,
            Permission::AddCompanyFuelLog,
            Permission::DeleteCompanyReport,
        ];
        for permission in all {
            assert_eq!(
                Permission::from_codename(permission.as_codename()),
                Some(permission)
            );
        }
    }

    #[test]
    fn test_unknown_codename_is_discarded() {
        let codenames = vec![
            "view_unit".to_string(),
            "fly_helicopter".to_string(),
            "view_company_unit".to_string(),
        ];
        let set = parse_codenames(&codenames);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Permission::ViewUnit));
        assert!(set.contains(&Permission::ViewCompanyUnit));
    }
}
