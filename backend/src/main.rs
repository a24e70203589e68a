//! Backend entry-point: wires configuration, persistence, and the HTTP server.

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(feature = "demo-data")]
use backend::demo_data::{DemoDataSettings, seed_demo_accounts_on_startup};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{key_fingerprint, load_session_key};
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{ServerConfig, ServerSettings, create_server};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::default();
    let key = load_session_key(&env)?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let bind_addr = settings
        .bind_addr()
        .parse()
        .wrap_err_with(|| format!("invalid bind address: {}", settings.bind_addr()))?;

    let db_pool = match &settings.database_url {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("failed to build database pool")?;
            Some(pool)
        }
        None => {
            warn!("no database configured; serving fixture data");
            None
        }
    };

    #[cfg(feature = "demo-data")]
    {
        let demo_settings =
            DemoDataSettings::load().wrap_err("failed to load demo data settings")?;
        seed_demo_accounts_on_startup(&demo_settings, db_pool.as_ref()).await?;
    }

    let mut config = ServerConfig::new(key, settings.cookie_secure, SameSite::Strict, bind_addr)
        .with_upload_root(settings.upload_root())
        .with_max_upload_bytes(
            settings
                .max_upload_bytes
                .unwrap_or(backend::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES),
        );
    if let Some(endpoint) = &settings.drive_endpoint {
        let endpoint = Url::parse(endpoint)
            .wrap_err_with(|| format!("invalid drive endpoint: {endpoint}"))?;
        config = config.with_drive(endpoint, settings.drive_timeout());
    }
    if let Some(pool) = db_pool {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(addr = %bind_addr, "server listening");
    server.await?;
    Ok(())
}

/// Apply pending database migrations before serving traffic.
///
/// Migrations run over a dedicated blocking connection so the async runtime
/// is not stalled during DDL.
async fn run_migrations(database_url: &str) -> Result<()> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn: AsyncConnectionWrapper<AsyncPgConnection> =
            AsyncConnectionWrapper::establish(&url)
                .wrap_err("failed to connect for migrations")?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| eyre!("failed to run migrations: {err}"))?;
        if !applied.is_empty() {
            info!(count = applied.len(), "database migrations applied");
        }
        Ok(())
    })
    .await
    .wrap_err("migration task failed")?
}
