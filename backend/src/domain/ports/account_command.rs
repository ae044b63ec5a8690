//! Driving ports for account registration, login, and token checks.
//!
//! HTTP handlers depend on these traits so handler tests can substitute
//! mocks instead of wiring password hashing and persistence.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, IssuedToken, LoginCredentials, Registration, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account. Duplicate usernames yield `invalid_request`.
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;

    /// Check credentials and issue a bearer token. Any mismatch yields
    /// `unauthorized` without revealing which part was wrong.
    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Owner of a live token; `unauthorized` for unknown or expired tokens.
    async fn verify(&self, token: &BearerToken) -> Result<UserId, Error>;
}
