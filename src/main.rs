use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_with_me::app::{AppServices, Repositories};
use travel_with_me::infrastructure::config::{Config, LogFormat};
use travel_with_me::infrastructure::db::{check_connection, create_pool, run_migrations};
use travel_with_me::infrastructure::http::{build_router, start_http_server};
use travel_with_me::infrastructure::repositories::RefreshTokenRepository;

const TOKEN_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Travel With Me backend on {}:{}",
        config.host,
        config.port
    );

    let repos = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = create_pool(database_url)
                .await
                .context("failed to create database pool")?;
            tracing::info!("Database connection pool created");

            check_connection(&pool)
                .await
                .context("database is not reachable")?;
            tracing::info!("Database connection verified");

            run_migrations(&pool)
                .await
                .context("failed to run migrations")?;
            tracing::info!("Database migrations applied");

            Repositories::postgres(Arc::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            Repositories::in_memory()
        }
    };

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("failed to create {}", config.upload_dir.display()))?;

    let services = AppServices::new(&config, &repos)?;
    spawn_token_cleanup(repos.refresh_token.clone());

    let app = build_router(&config, &services, repos.pool.clone());
    start_http_server(&config, app).await
}

fn spawn_token_cleanup(refresh_token_repo: Arc<dyn RefreshTokenRepository>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match refresh_token_repo.delete_expired().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Expired refresh tokens deleted"),
                Err(e) => tracing::error!(error = %e, "Refresh token cleanup failed"),
            }
        }
    });
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "travel_with_me=debug,tower_http=debug"
    } else {
        "travel_with_me=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
