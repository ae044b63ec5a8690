//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) describe what the domain needs from storage.
//! Driving ports (`PostCommand`, `PostQuery`, `AccountCommand`,
//! `TokenVerifier`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod auth_token_repository;
mod location_repository;
mod post_command;
mod post_query;
mod post_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockTokenVerifier};
pub use account_command::{AccountCommand, TokenVerifier};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
#[cfg(test)]
pub use location_repository::MockLocationRepository;
pub use location_repository::{LocationRepository, LocationRepositoryError};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{CreatePostRequest, PostCommand};
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::{NearbyPosts, PostQuery};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
