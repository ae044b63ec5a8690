//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers, and the services that drive them through ports.
//! Types are immutable where possible and document their invariants in
//! Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Coordinate / haversine_km: great-circle geometry.
//! - Gazetteer / NearestLocationResolver: nearest-location resolution.
//! - User / Post and their validated parts.
//! - PostService / AccountService / GazetteerService: port-driving services.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod gazetteer;
pub mod gazetteer_service;
pub mod geo;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod resolver;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    BearerToken, CredentialsValidationError, IssuedToken, LoginCredentials, PASSWORD_MAX_BYTES,
    PasswordHashingError, Registration, TokenFingerprint, hash_password, verify_password,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gazetteer::{
    Gazetteer, GazetteerError, LOCATION_NAME_MAX, LocationName, LocationSeed,
    LocationValidationError, NamedLocation, campus_seed, load_gazetteer, parse_seed_json,
};
pub use self::gazetteer_service::GazetteerService;
pub use self::geo::{Coordinate, CoordinateValidationError, EARTH_RADIUS_KM, haversine_km};
pub use self::post::{NewPost, POST_CONTENT_MAX, Post, PostContent, PostId, PostValidationError};
pub use self::post_service::PostService;
pub use self::resolver::{NearestLocationResolver, Resolution, ResolveError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{PasswordHash, User, UserId, UserValidationError, Username};

