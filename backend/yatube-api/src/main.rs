use actix_cors::Cors;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yatube_api::config::StorageBackend;
use yatube_api::db::{MemoryRepository, PgRepository, Repository};
use yatube_api::jwt::JwtValidator;
use yatube_api::middleware::MetricsMiddleware;
use yatube_api::{routes, AppState, Config};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_repository(config: &Config) -> Result<Arc<dyn Repository>> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let repo = PgRepository::new(pool);

            if config.database.run_migrations {
                repo.migrate().await.context("Failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }

            Ok(Arc::new(repo))
        }
        StorageBackend::Memory => {
            if config.app.is_production() {
                tracing::warn!("In-memory storage selected in production; data is not persisted");
            }
            Ok(Arc::new(MemoryRepository::new()))
        }
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

/// Yatube API
///
/// Serves `/api/v1/posts`, `/api/v1/groups` and `/api/v1/follow` plus the
/// health probes and `/metrics`.
#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to load configuration")?;
    tracing::info!(env = %config.app.env, storage = ?config.storage, "Starting yatube-api");

    let jwt = JwtValidator::from_config(&config.auth).context("Failed to initialise JWT validation")?;
    let repo = build_repository(&config).await?;
    let state = web::Data::new(AppState::new(repo, jwt, config.pagination));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Listening on {}", bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(MetricsMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(build_cors(&allowed_origins))
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    tracing::info!("yatube-api stopped");
    Ok(())
}
