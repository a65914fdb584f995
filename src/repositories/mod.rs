//! Repositorios de acceso a datos
//!
//! Un repositorio por agregado, con consultas verificadas en runtime.

pub mod file_repository;
pub mod fuel_repository;
pub mod maintenance_repository;
pub mod organization_repository;
pub mod report_repository;
pub mod unit_repository;
pub mod user_repository;
