//! Servicios del sistema
//!
//! Lógica de negocio por dominio: autenticación, permisos, membresías,
//! flujo de mantención, reportes y notificaciones.

pub mod auth_service;
pub mod export_service;
pub mod jwt_service;
pub mod maintenance_service;
pub mod membership_service;
pub mod notification_service;
pub mod permission_service;
pub mod report_service;
