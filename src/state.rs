//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use lettre::SmtpTransport;
use sqlx::PgPool;

use crate::config::EnvironmentConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    /// Transporte SMTP; `None` si no hay SMTP configurado
    pub mailer: Option<SmtpTransport>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, mailer: Option<SmtpTransport>) -> Self {
        Self {
            pool,
            config,
            mailer,
        }
    }
}
