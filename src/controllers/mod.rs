//! Controllers de la API
//!
//! Validación de requests, chequeos de permisos y orquestación de
//! repositorios y servicios.

pub mod auth_controller;
pub mod document_controller;
pub mod fuel_controller;
pub mod maintenance_controller;
pub mod organization_controller;
pub mod report_controller;
pub mod unit_controller;
