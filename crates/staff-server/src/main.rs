//! Staffing RS Server
//!
//! HTTP server for the staffing backend.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staff_api::AppState;
use staff_auth::JwtService;
use staff_core::config::AppConfig;
use staff_db::{Database, DatabaseConfig, MemoryStore, PgStore};
use staff_services::SharedStore;

mod health;

use health::{HealthChecker, HealthConfig};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        warn!("Failed to load config from env: {}, using defaults", e);
        AppConfig::default()
    });

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.server.host,
        port = config.server.port,
        "Starting Staffing RS"
    );

    if config.auth.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("JWT_SECRET is not set; using the built-in development secret");
    }

    let (store, db) = open_store(&config).await?;
    let health = Arc::new(HealthChecker::new(HealthConfig::default(), store.clone()));
    let state = AppState::new(
        store,
        JwtService::new(config.auth.jwt_secret.as_bytes()),
        config.staffing.clone(),
    );

    let app = build_router(
        state,
        health,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let addr = config.server_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await;
    }
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,staff_server=debug,staff_api=debug,tower_http=debug".into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// PostgreSQL when configured and reachable, otherwise the in-memory store
async fn open_store(config: &AppConfig) -> anyhow::Result<(SharedStore, Option<Database>)> {
    if !config.has_database() {
        warn!("DATABASE_URL is not set. Serving from the in-memory store.");
        return Ok((Arc::new(MemoryStore::new()), None));
    }

    let db_config = DatabaseConfig::from_settings(&config.database);
    let db = match Database::connect(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            warn!("Failed to connect to database: {}. Serving from the in-memory store.", e);
            return Ok((Arc::new(MemoryStore::new()), None));
        }
    };

    if config.database.run_migrations {
        db.migrate().await?;
    }

    let stats = db.stats();
    info!(size = stats.size, idle = stats.idle, "Connected to database");
    Ok((Arc::new(PgStore::new(db.pool().clone())), Some(db)))
}

fn build_router(state: AppState, health: Arc<HealthChecker>, request_timeout: Duration) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::liveness))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(health);

    Router::new()
        .merge(health_routes)
        .merge(staff_api::router().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let health = Arc::new(HealthChecker::new(HealthConfig::default(), store.clone()));
        let config = AppConfig::default();
        let state = AppState::new(
            store,
            JwtService::new(config.auth.jwt_secret.as_bytes()),
            config.staffing,
        );
        build_router(state, health, Duration::from_secs(5))
    }

    async fn status_of(uri: &str) -> StatusCode {
        test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/health/live").await, StatusCode::OK);
        assert_eq!(status_of("/health/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_api_is_mounted_behind_auth() {
        assert_eq!(status_of("/api/projects").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_open_store_without_database_uses_memory() {
        let (store, db) = open_store(&AppConfig::default()).await.unwrap();
        assert_eq!(staff_db::StaffingStore::backend(&*store), "memory");
        assert!(db.is_none());
    }
}
