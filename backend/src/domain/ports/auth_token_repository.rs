//! Port for bearer token persistence.
//!
//! Adapters only ever see [`TokenFingerprint`]s, never raw tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{TokenFingerprint, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Record a token fingerprint for `user_id` valid until `expires_at`.
    async fn store(
        &self,
        fingerprint: &TokenFingerprint,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Owner of a token that has not expired at `now`.
    async fn find_user_for_token(
        &self,
        fingerprint: &TokenFingerprint,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError>;
}
