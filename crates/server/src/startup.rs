use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Assemble the router over an already-connected database.
pub fn build_app(db: DatabaseConnection, cfg: &AppConfig) -> Router {
    let auth_cfg = auth::ServerAuthConfig {
        jwt_secret: cfg.auth.jwt_secret.clone(),
        token_ttl_hours: cfg.auth.token_ttl_hours,
        secure_cookie: false,
    };
    let state = auth::ServerState::new(db, auth_cfg);
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(err = %e, "failed to listen for ctrl_c; shutdown only on process kill");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect, migrate, and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr: SocketAddr = cfg
        .server
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.server.bind_addr())))?;

    if cfg.auth.uses_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.server.run_migrations {
        models::db::migrate(&db).await?;
    }

    let app = build_app(db, &cfg);

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}
