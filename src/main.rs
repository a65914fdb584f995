mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use dotenvy::dotenv;
use middleware::cors::cors_middleware;
use services::notification_service::build_mailer;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚒 Material Mayor - Gestión de flota de Bomberos");
    info!("=================================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Transporte SMTP para notificaciones (opcional)
    let mailer = build_mailer(&config);
    if mailer.is_none() {
        info!("✉️  SMTP no configurado: las notificaciones se omitirán");
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let app_state = AppState::new(pool, config, mailer);

    // Rutas de unidades y sus sub-recursos (combustible, mantención, reportes)
    let unit_router = routes::unit_routes::create_unit_router(app_state.clone())
        .merge(routes::fuel_routes::create_unit_fuel_router(app_state.clone()))
        .merge(routes::maintenance_routes::create_unit_maintenance_router(
            app_state.clone(),
        ))
        .merge(routes::report_routes::create_unit_report_router(app_state.clone()));

    let api_router = Router::new()
        .nest("/auth", routes::auth_routes::create_auth_router(app_state.clone()))
        .merge(routes::organization_routes::create_organization_router(
            app_state.clone(),
        ))
        .nest("/units", unit_router)
        .nest(
            "/stations",
            routes::fuel_routes::create_station_router(app_state.clone()),
        )
        .nest(
            "/maintenance",
            routes::maintenance_routes::create_maintenance_router(app_state.clone()),
        )
        .nest(
            "/documents",
            routes::document_routes::create_document_router(app_state.clone()),
        );

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_router)
        .layer(cors_middleware())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔐 Autenticación:");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Perfil y permisos efectivos");
    info!("🏛️  Organización:");
    info!("   GET  /api/entities - Listar entidades");
    info!("   POST /api/memberships - Asignar cargo");
    info!("   GET  /api/memberships/history - Historial de cargos");
    info!("🚒 Unidades:");
    info!("   GET  /api/units - Listar unidades");
    info!("   POST /api/units - Crear unidad");
    info!("   GET  /api/units/:id - Detalle con documentos");
    info!("   POST /api/units/:id/documents/:kind - Asociar documento");
    info!("⛽ Combustible:");
    info!("   GET  /api/units/:id/fuel - Cargas del mes");
    info!("   POST /api/units/:id/fuel - Registrar carga");
    info!("   GET  /api/stations - Estaciones de servicio");
    info!("🔧 Mantención:");
    info!("   GET  /api/units/:id/maintenance - Solicitudes de la unidad");
    info!("   POST /api/units/:id/maintenance - Crear solicitud");
    info!("   POST /api/units/:id/maintenance/:log/command-evaluation - Evaluación Comandancia");
    info!("   POST /api/units/:id/maintenance/:log/admin-evaluation - Evaluación Administración");
    info!("   POST /api/units/:id/maintenance/:log/finish - Finalizar solicitud");
    info!("📋 Reportes:");
    info!("   GET  /api/units/:id/reports - Calendario mensual");
    info!("   POST /api/units/:id/reports - Crear reporte diario");
    info!("   GET  /api/units/:id/reports/:report/export - Documento imprimible");
    info!("📄 Documentos:");
    info!("   POST /api/documents - Subir documento");
    info!("   GET  /api/documents/:id/download - Descargar documento");
    info!("   POST /api/documents/notify-expirations - Resumen de vencimientos");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "material-mayor",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
