//! Account domain services: registration, login, and bearer token checks.
//!
//! Argon2 hashing is CPU bound, so it runs on the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountCommand, AuthTokenRepository, AuthTokenRepositoryError, TokenVerifier,
    UserRepository, UserRepositoryError,
};
use crate::domain::{
    BearerToken, Error, IssuedToken, LoginCredentials, PasswordHash, Registration, User, UserId,
    hash_password, verify_password,
};

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateUsername { username } => {
            Error::invalid_request(format!("username {username} is already taken")).with_details(
                json!({
                    "field": "username",
                    "code": "duplicate_username",
                }),
            )
        }
    }
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid username or password")
}

async fn hash_off_thread(password: &str) -> Result<PasswordHash, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
}

async fn verify_off_thread(password: &str, hash: PasswordHash) -> Result<bool, Error> {
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

/// Account service implementing [`AccountCommand`] and [`TokenVerifier`].
#[derive(Clone)]
pub struct AccountService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    token_ttl: Duration,
}

impl<U, T> AccountService<U, T> {
    /// Create a service issuing tokens that live for `token_ttl`.
    pub fn new(users: Arc<U>, tokens: Arc<T>, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }
}

#[async_trait]
impl<U, T> AccountCommand for AccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let password_hash = hash_off_thread(registration.password()).await?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            password_hash,
            Utc::now(),
        );
        self.users.create(&user).await.map_err(map_user_error)?;

        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(*user.id())
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<IssuedToken, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            warn!(username = credentials.username(), "login for unknown user");
            return Err(invalid_credentials());
        };

        let matches =
            verify_off_thread(credentials.password(), user.password_hash().clone()).await?;
        if !matches {
            warn!(user_id = %user.id(), "login with wrong password");
            return Err(invalid_credentials());
        }

        let token = BearerToken::generate();
        let expires_at = Utc::now() + self.token_ttl;
        self.tokens
            .store(&token.fingerprint(), user.id(), expires_at)
            .await
            .map_err(map_token_error)?;

        info!(user_id = %user.id(), %expires_at, "token issued");
        Ok(IssuedToken {
            token,
            user_id: *user.id(),
            expires_at,
        })
    }
}

#[async_trait]
impl<U, T> TokenVerifier for AccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn verify(&self, token: &BearerToken) -> Result<UserId, Error> {
        self.tokens
            .find_user_for_token(&token.fingerprint(), Utc::now())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("invalid or expired token"))
    }
}
