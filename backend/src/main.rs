//! GeoPost entry-point: loads settings, prepares storage and the gazetteer,
//! then serves the REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use geopost::domain::load_gazetteer;
use geopost::inbound::http::health::HealthState;
use geopost::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use server::{ServerConfig, Settings, create_server};

async fn connect(database_url: &str, settings: &Settings) -> std::io::Result<DbPool> {
    let applied = run_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migration failed: {err}")))?;
    info!(applied, "database schema up to date");

    let mut pool_config = PoolConfig::new(database_url);
    if let Some(max_size) = settings.pool_max_size {
        pool_config = pool_config.with_max_size(max_size);
    }
    DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;

    let mut config = ServerConfig::new(settings.bind_addr()?)
        .with_require_auth(settings.require_auth)
        .with_token_ttl(settings.token_ttl());

    if settings.seed_locations() {
        let gazetteer = load_gazetteer(settings.locations_file.as_deref()).map_err(|err| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string())
        })?;
        config = config.with_seed(gazetteer);
    }

    match settings.database_url.as_deref() {
        Some(url) => config = config.with_db_pool(connect(url, &settings).await?),
        None => warn!("GEOPOST_DATABASE_URL unset; data is kept in memory only"),
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(Some(server::make_metrics()?));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr, "starting server");
    create_server(health_state, config).await?.await
}
