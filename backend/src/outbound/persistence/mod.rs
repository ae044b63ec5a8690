//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain's driven ports on top of
//! `diesel-async` connections pooled by `bb8`. Row structs and the schema
//! stay private to this module; every adapter converts rows into domain
//! types at the boundary and maps database failures onto its port error.
//!
//! # Example
//!
//! ```ignore
//! use geopost::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/geopost")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_auth_token_repository;
pub(crate) mod diesel_basic_error_mapping;
mod diesel_location_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_location_repository::DieselLocationRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
