//! HTTP server initialization and runtime setup.
//!
//! Handles storage backend selection, cache and media host setup, and the
//! Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::media::CloudinaryMediaHost;
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{
    PgRestaurantRepository, PgReviewRepository, PgTokenRepository,
};
use crate::routes::{RouterOptions, app_router};
use crate::state::{AppState, Backends};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations (or the in-memory store)
/// - Redis cache (or NullCache fallback)
/// - Media host client
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The media host client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let cache = connect_cache(&config).await;

    let media = CloudinaryMediaHost::new(config.cloudinary_config())
        .context("Failed to build media host client")?;
    tracing::info!(cloud = %config.media_cloud_name, "Media host configured");

    let backends = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = Arc::new(connect_database(&config).await?);
            Backends {
                restaurants: Arc::new(PgRestaurantRepository::new(pool.clone())),
                reviews: Arc::new(PgReviewRepository::new(pool.clone())),
                tokens: Arc::new(PgTokenRepository::new(pool)),
                media: Arc::new(media),
                cache,
            }
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(MemoryStore::new());
            Backends {
                restaurants: store.clone(),
                reviews: store.clone(),
                tokens: store,
                media: Arc::new(media),
                cache,
            }
        }
    };

    let state = AppState::new(
        backends,
        config.restaurant_settings(),
        config.token_signing_secret.clone(),
    );

    let app = app_router(
        state,
        RouterOptions {
            behind_proxy: config.behind_proxy,
            rate_limit: true,
            max_avatar_bytes: config.max_avatar_bytes,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the pool with the configured limits and applies pending migrations.
async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;
    tracing::info!("Migrations applied");

    Ok(pool)
}

/// Connects to Redis when configured, falling back to [`NullCache`].
async fn connect_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
