//! Replace the stored gazetteer with the built-in campus list or a JSON file.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use geopost::domain::{GazetteerService, load_gazetteer};
use geopost::outbound::persistence::{
    DbPool, DieselLocationRepository, PoolConfig, run_migrations,
};
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "GEOPOST_DATABASE_URL";

/// `seed-locations` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-locations",
    about = "Replace the stored gazetteer of named locations",
    version
)]
struct CliArgs {
    /// JSON array of `{name, latitude, longitude}`. Defaults to the campus list.
    #[arg(long = "file", value_name = "path")]
    file: Option<PathBuf>,
    /// Database connection URL. Falls back to `GEOPOST_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let gazetteer = load_gazetteer(args.file.as_deref())
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error.to_string()))?;
    let database_url = resolve_database_url(args.database_url)?;

    run_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("migrate database: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let service = GazetteerService::new(Arc::new(DieselLocationRepository::new(pool)));
    service
        .reseed(&gazetteer)
        .await
        .map_err(|error| io::Error::other(format!("reseed gazetteer: {error}")))?;

    let stored = service
        .load()
        .await
        .map_err(|error| io::Error::other(format!("reload gazetteer: {error}")))?;
    for location in stored.list_all() {
        let coordinate = location.coordinate();
        info!(
            name = %location.name(),
            latitude = coordinate.latitude(),
            longitude = coordinate.longitude(),
            "stored location"
        );
    }
    info!(count = stored.len(), "gazetteer replaced");
    Ok(())
}

fn resolve_database_url(explicit: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let from_env = env::var(DATABASE_URL_ENV).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or GEOPOST_DATABASE_URL",
        )
    })?;
    if from_env.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "GEOPOST_DATABASE_URL must not be empty",
        ));
    }
    Ok(from_env)
}
