//! Resolución de permisos y alcances de visibilidad
//!
//! Implementa el esquema de tres niveles repetido por dominio: global,
//! compañía (entidad propia) y propio. Los niveles se evalúan en ese orden
//! de prioridad; gana el primero que aplica y nunca se combinan. El alcance
//! por entidad se decide comparando la entidad del objeto con la entidad de
//! la asignación activa del usuario, nunca dentro de la resolución de
//! permisos.

use uuid::Uuid;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::maintenance_log::MaintenanceLog;
use crate::models::permission::{Permission, PermissionSet, VisibilityScope};
use crate::models::unit::Unit;

/// Permisos efectivos: directos ∪ heredados del cargo activo.
/// Sin asignación activa, solo aplican los directos.
pub fn effective_permissions(
    direct: &PermissionSet,
    position: Option<&PermissionSet>,
) -> PermissionSet {
    match position {
        Some(from_position) => direct.union(from_position).copied().collect(),
        None => direct.clone(),
    }
}

/// Resuelve el alcance de visibilidad de tres niveles para un dominio.
///
/// `own` en `None` indica que el dominio no tiene nivel "propio".
fn three_tier_scope(
    user: &AuthenticatedUser,
    global: Permission,
    company: Permission,
    own: Option<Permission>,
) -> VisibilityScope {
    if user.is_superuser || user.has_perm(global) {
        return VisibilityScope::All;
    }

    if user.has_perm(company) {
        return match user.entity_id {
            Some(entity_id) => VisibilityScope::Entity(entity_id),
            // Permiso de compañía sin asignación activa no da acceso
            None => VisibilityScope::None,
        };
    }

    if let Some(own_permission) = own {
        if user.has_perm(own_permission) {
            return VisibilityScope::Own(user.user_id);
        }
    }

    VisibilityScope::None
}

/// Chequeo puntual sobre un objeto con entidad y autor conocidos
fn three_tier_check(
    user: &AuthenticatedUser,
    object_entity_id: Uuid,
    object_author_id: Option<Uuid>,
    global: Permission,
    company: Permission,
    own: Option<Permission>,
) -> bool {
    match three_tier_scope(user, global, company, own) {
        VisibilityScope::All => true,
        VisibilityScope::Entity(entity_id) => object_entity_id == entity_id,
        VisibilityScope::Own(user_id) => object_author_id == Some(user_id),
        VisibilityScope::None => false,
    }
}

// ==========================
// Unidades
// ==========================

pub fn unit_visibility(user: &AuthenticatedUser) -> VisibilityScope {
    three_tier_scope(user, Permission::ViewUnit, Permission::ViewCompanyUnit, None)
}

pub fn can_view_unit(user: &AuthenticatedUser, unit: &Unit) -> bool {
    three_tier_check(
        user,
        unit.entity_id,
        None,
        Permission::ViewUnit,
        Permission::ViewCompanyUnit,
        None,
    )
}

pub fn can_create_unit(user: &AuthenticatedUser, target_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        target_entity_id,
        None,
        Permission::AddUnit,
        Permission::AddCompanyUnit,
        None,
    )
}

/// Editar una unidad puede moverla de entidad: en el nivel de compañía tanto
/// la entidad actual como la de destino deben ser la propia.
pub fn can_edit_unit(user: &AuthenticatedUser, unit: &Unit, new_entity_id: Uuid) -> bool {
    if user.is_superuser || user.has_perm(Permission::ChangeUnit) {
        return true;
    }
    if user.has_perm(Permission::ChangeCompanyUnit) {
        return match user.entity_id {
            Some(entity_id) => unit.entity_id == entity_id && new_entity_id == entity_id,
            None => false,
        };
    }
    false
}

pub fn can_delete_unit(user: &AuthenticatedUser, unit: &Unit) -> bool {
    three_tier_check(
        user,
        unit.entity_id,
        None,
        Permission::DeleteUnit,
        Permission::DeleteCompanyUnit,
        None,
    )
}

// ==========================
// Solicitudes de mantención
// ==========================

pub fn maintenance_visibility(user: &AuthenticatedUser) -> VisibilityScope {
    three_tier_scope(
        user,
        Permission::ViewMaintenance,
        Permission::ViewCompanyMaintenance,
        Some(Permission::ViewOwnMaintenance),
    )
}

/// `unit_entity_id` es la entidad de la unidad de la solicitud
pub fn can_view_maintenance(
    user: &AuthenticatedUser,
    log: &MaintenanceLog,
    unit_entity_id: Uuid,
) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        Some(log.author_id),
        Permission::ViewMaintenance,
        Permission::ViewCompanyMaintenance,
        Some(Permission::ViewOwnMaintenance),
    )
}

pub fn can_edit_maintenance(
    user: &AuthenticatedUser,
    log: &MaintenanceLog,
    unit_entity_id: Uuid,
) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        Some(log.author_id),
        Permission::ChangeMaintenance,
        Permission::ChangeCompanyMaintenance,
        Some(Permission::ChangeOwnMaintenance),
    )
}

pub fn can_delete_maintenance(
    user: &AuthenticatedUser,
    log: &MaintenanceLog,
    unit_entity_id: Uuid,
) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        Some(log.author_id),
        Permission::DeleteMaintenance,
        Permission::DeleteCompanyMaintenance,
        Some(Permission::DeleteOwnMaintenance),
    )
}

// ==========================
// Combustible
// ==========================

pub fn can_view_fuel(user: &AuthenticatedUser, unit_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        None,
        Permission::ViewFuelLog,
        Permission::ViewCompanyFuelLog,
        None,
    )
}

pub fn can_add_fuel(user: &AuthenticatedUser, unit_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        None,
        Permission::AddFuelLog,
        Permission::AddCompanyFuelLog,
        None,
    )
}

// ==========================
// Reportes de checklist
// ==========================

pub fn can_view_report(user: &AuthenticatedUser, unit_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        None,
        Permission::ViewReport,
        Permission::ViewCompanyReport,
        None,
    )
}

pub fn can_add_report(user: &AuthenticatedUser, unit_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        None,
        Permission::AddReport,
        Permission::AddCompanyReport,
        None,
    )
}

pub fn can_delete_report(user: &AuthenticatedUser, unit_entity_id: Uuid) -> bool {
    three_tier_check(
        user,
        unit_entity_id,
        None,
        Permission::DeleteReport,
        Permission::DeleteCompanyReport,
        None,
    )
}

// ==========================
// Entidades
// ==========================

pub fn entity_visibility(user: &AuthenticatedUser) -> VisibilityScope {
    if user.is_superuser || user.has_perm(Permission::ViewEntity) {
        return VisibilityScope::All;
    }
    if user.has_perm(Permission::ViewOwnEntity) {
        return match user.entity_id {
            Some(entity_id) => VisibilityScope::Entity(entity_id),
            None => VisibilityScope::None,
        };
    }
    VisibilityScope::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::permission::Permission::*;
    use std::collections::HashSet;

    fn user_with(
        permissions: &[Permission],
        entity_id: Option<Uuid>,
        is_superuser: bool,
    ) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: Uuid::new_v4(),
            username: "jperez".to_string(),
            full_name: "Juan Pérez".to_string(),
            email: None,
            is_superuser,
            entity_id,
            entity_type: None,
            position_id: None,
            permissions: permissions.iter().copied().collect(),
        }
    }

    #[test]
    fn test_effective_permissions_union() {
        let direct: PermissionSet = [ViewUnit].into_iter().collect();
        let position: PermissionSet = [ViewCompanyUnit, AddFuelLog].into_iter().collect();

        // Con asignación activa: unión
        let effective = effective_permissions(&direct, Some(&position));
        assert_eq!(effective.len(), 3);
        assert!(effective.contains(&ViewUnit));
        assert!(effective.contains(&ViewCompanyUnit));
        assert!(effective.contains(&AddFuelLog));

        // Sin asignación: solo los directos
        let effective = effective_permissions(&direct, None);
        assert_eq!(effective, direct);

        // Sin permisos directos, hereda los del cargo completos
        let effective = effective_permissions(&HashSet::new(), Some(&position));
        assert_eq!(effective, position);
    }

    #[test]
    fn test_superuser_sees_all() {
        let user = user_with(&[], None, true);
        assert_eq!(unit_visibility(&user), VisibilityScope::All);
        assert_eq!(maintenance_visibility(&user), VisibilityScope::All);
    }

    #[test]
    fn test_company_scope_requires_membership() {
        let entity = Uuid::new_v4();

        let with_membership = user_with(&[ViewCompanyUnit], Some(entity), false);
        assert_eq!(unit_visibility(&with_membership), VisibilityScope::Entity(entity));

        // El mismo permiso sin asignación activa no da acceso
        let without_membership = user_with(&[ViewCompanyUnit], None, false);
        assert_eq!(unit_visibility(&without_membership), VisibilityScope::None);
    }

    #[test]
    fn test_tiers_do_not_combine_first_wins() {
        let entity = Uuid::new_v4();
        // Con permiso global y de compañía a la vez, gana el global
        let user = user_with(&[ViewMaintenance, ViewCompanyMaintenance], Some(entity), false);
        assert_eq!(maintenance_visibility(&user), VisibilityScope::All);

        // Compañía por sobre propio
        let user = user_with(
            &[ViewCompanyMaintenance, ViewOwnMaintenance],
            Some(entity),
            false,
        );
        assert_eq!(maintenance_visibility(&user), VisibilityScope::Entity(entity));
    }

    #[test]
    fn test_own_scope() {
        let user = user_with(&[ViewOwnMaintenance], None, false);
        assert_eq!(
            maintenance_visibility(&user),
            VisibilityScope::Own(user.user_id)
        );
    }

    #[test]
    fn test_no_permissions_sees_nothing() {
        let user = user_with(&[], Some(Uuid::new_v4()), false);
        assert_eq!(unit_visibility(&user), VisibilityScope::None);
        assert_eq!(maintenance_visibility(&user), VisibilityScope::None);
        assert!(!can_add_fuel(&user, Uuid::new_v4()));
    }

    #[test]
    fn test_company_edit_cannot_move_unit_to_other_entity() {
        let entity = Uuid::new_v4();
        let other_entity = Uuid::new_v4();
        let user = user_with(&[ChangeCompanyUnit], Some(entity), false);

        let unit = Unit {
            id: Uuid::new_v4(),
            unit_number: "B-1".to_string(),
            description: "Bomba".to_string(),
            plate_number: "ABCD12".to_string(),
            entity_id: entity,
            brand: None,
            model: None,
            year: None,
            vehicle_type: None,
            fuel_kind: None,
            fuel_tank_capacity: None,
            engine_number: None,
            chassis_number: None,
            tire_size: None,
            tire_pressure: None,
            padron_id: None,
            soap_id: None,
            technical_inspection_id: None,
            vehicle_permit_id: None,
            state: crate::models::unit::UnitState::InOperation,
            editable: true,
            deleted: false,
            created_at: chrono::Utc::now(),
        };

        assert!(can_edit_unit(&user, &unit, entity));
        assert!(!can_edit_unit(&user, &unit, other_entity));
    }
}
