pub mod api;
pub mod authorization;
pub mod config;
pub mod crypto;
pub mod db;
pub mod identity;
pub mod models;
pub mod service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::models::Role;
use crate::service::{MedicalService, ServiceOptions};

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Service error: {0}")]
    Service(#[from] service::ServiceError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub async fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let cfg = config::AppConfig::from_env()?;
    if let Some(parent) = cfg.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = db::open_database(&cfg.database_path)?;
    tracing::info!(path = %cfg.database_path.display(), "Database ready");

    let service = Arc::new(MedicalService::new(
        conn,
        ServiceOptions {
            physician_user_password: cfg.physician_user_password.clone(),
        },
    ));

    match cfg.admin_password.as_deref() {
        Some(password) => {
            service.ensure_user(&cfg.admin_user, password, &[Role::Admin, Role::User], None)?;
        }
        None => tracing::warn!("No administrator password configured; skipping bootstrap"),
    }

    let listener = tokio::net::TcpListener::bind(cfg.bind).await?;
    tracing::info!(addr = %cfg.bind, "Listening");
    axum::serve(listener, api::api_router(service)).await?;
    Ok(())
}
