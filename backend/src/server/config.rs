//! Runtime settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use geopost::domain::Gazetteer;
use geopost::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Settings read from `GEOPOST_*` environment variables, CLI flags and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GEOPOST")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the server keeps everything in memory.
    pub database_url: Option<String>,
    /// Replace the stored gazetteer at startup.
    pub seed_locations: Option<bool>,
    /// JSON list of `{name, latitude, longitude}` used when seeding.
    pub locations_file: Option<PathBuf>,
    /// Reject post mutations that carry no bearer token.
    #[ortho_config(default = false)]
    pub require_auth: bool,
    /// Lifetime of issued bearer tokens.
    pub token_ttl_minutes: Option<i64>,
    /// Upper bound on pooled database connections.
    pub pool_max_size: Option<u32>,
}

impl Settings {
    /// Parse the bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    pub fn seed_locations(&self) -> bool {
        self.seed_locations.unwrap_or(true)
    }

    /// Token lifetime; non-positive values fall back to the default.
    pub fn token_ttl(&self) -> chrono::Duration {
        let minutes = self
            .token_ttl_minutes
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        chrono::Duration::minutes(minutes)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) require_auth: bool,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) seed: Option<Gazetteer>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            require_auth: false,
            token_ttl: chrono::Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            seed: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one every port is served by the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }

    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: chrono::Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Gazetteer written to the location store before serving.
    #[must_use]
    pub fn with_seed(mut self, seed: Gazetteer) -> Self {
        self.seed = Some(seed);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "GEOPOST_BIND_ADDR",
        "GEOPOST_DATABASE_URL",
        "GEOPOST_SEED_LOCATIONS",
        "GEOPOST_LOCATIONS_FILE",
        "GEOPOST_REQUIRE_AUTH",
        "GEOPOST_TOKEN_TTL_MINUTES",
        "GEOPOST_POOL_MAX_SIZE",
    ];

    fn load() -> Settings {
        Settings::load_from_iter([OsString::from("geopost")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|var| (var, None::<String>)));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert!(settings.seed_locations());
        assert!(settings.locations_file.is_none());
        assert!(!settings.require_auth);
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(60));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("GEOPOST_BIND_ADDR", Some("127.0.0.1:9000")),
            ("GEOPOST_DATABASE_URL", Some("postgres://localhost/geopost")),
            ("GEOPOST_SEED_LOCATIONS", Some("false")),
            ("GEOPOST_LOCATIONS_FILE", Some("/tmp/places.json")),
            ("GEOPOST_REQUIRE_AUTH", Some("true")),
            ("GEOPOST_TOKEN_TTL_MINUTES", Some("15")),
            ("GEOPOST_POOL_MAX_SIZE", Some("4")),
        ]);

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("override parses").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/geopost")
        );
        assert!(!settings.seed_locations());
        assert_eq!(
            settings.locations_file,
            Some(PathBuf::from("/tmp/places.json"))
        );
        assert!(settings.require_auth);
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(settings.pool_max_size, Some(4));
    }

    #[rstest]
    fn malformed_bind_addr_is_rejected() {
        let _guard = lock_env([("GEOPOST_BIND_ADDR", Some("not-an-address"))]);

        let error = load().bind_addr().expect_err("invalid address");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(-5))]
    #[case(None)]
    fn token_ttl_falls_back_to_an_hour(#[case] minutes: Option<i64>) {
        let settings = Settings {
            bind_addr: None,
            database_url: None,
            seed_locations: None,
            locations_file: None,
            require_auth: false,
            token_ttl_minutes: minutes,
            pool_max_size: None,
        };
        assert_eq!(settings.token_ttl(), chrono::Duration::minutes(60));
    }
}
