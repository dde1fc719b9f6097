use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, AppState, StorageBackend, create_router};
use auth::{JwtConfig, JwtService};
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use media::PosterStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting movie catalog API");

    let config = ApiConfig::load().context("Failed to load configuration")?;

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt_secret.clone(),
        token_ttl_seconds: config.token_ttl_seconds,
    })?;

    let posters = PosterStore::new(&config.upload_dir);
    posters.ensure_dir().await?;

    let state = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            if !health_check(&pool).await {
                anyhow::bail!("Failed to connect to database");
            }
            info!("Database connection successful");

            run_migrations(&pool).await?;

            AppState::postgres(pool, jwt, posters, config.cookie_secure)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(jwt, posters, config.cookie_secure)
        }
    };

    let app = create_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
