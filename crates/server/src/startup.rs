use std::{net::SocketAddr, sync::Arc};

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::{AppConfig, CorsConfig, ServerConfig, StorageBackend};
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::policy::repo::{InMemoryPolicyRepository, SeaOrmPolicyRepository};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

/// Any origin when none are configured; otherwise only the listed origins.
pub fn build_cors(cfg: &CorsConfig) -> CorsLayer {
    if cfg.is_permissive() {
        return CorsLayer::very_permissive();
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn bind_addr(cfg: &ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address {}:{}: {e}", cfg.host, cfg.port)))
}

/// Open the configured storage once and wrap it in the shared handler state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    match cfg.storage.backend {
        StorageBackend::Postgres => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(|e| StartupError::Storage(e.to_string()))?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Storage(format!("migrations failed: {e}")))?;
            info!("postgres policy store ready");
            Ok(ServerState::new(Arc::new(SeaOrmPolicyRepository::new(db))))
        }
        StorageBackend::Memory => {
            warn!("using in-memory policy store; data is lost on restart");
            Ok(ServerState::new(Arc::new(InMemoryPolicyRepository::new())))
        }
    }
}

/// Router with CORS from config.
pub fn build_app(cfg: &AppConfig, state: ServerState) -> Router {
    routes::build_router(state, build_cors(&cfg.cors))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let state = build_state(&cfg).await?;
    let app = build_app(&cfg, state);

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, backend = ?cfg.storage.backend, "starting policy tracker");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}
