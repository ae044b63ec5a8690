//! Port for gazetteer persistence.
//!
//! The stored gazetteer is the source of truth the server loads at startup.
//! Seeding is destructive: [`LocationRepository::replace_all`] drops every
//! existing row and inserts the new list atomically.

use async_trait::async_trait;

use crate::domain::NamedLocation;

use super::define_port_error;

define_port_error! {
    /// Errors raised by location repository adapters.
    pub enum LocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "location repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "location repository query failed: {message}",
        /// A stored row could not be turned back into a domain entry.
        InvalidRow { message: String } => "stored location is invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Replace the stored gazetteer with `entries`, preserving their order.
    async fn replace_all(&self, entries: &[NamedLocation]) -> Result<(), LocationRepositoryError>;

    /// Every stored entry in insertion order.
    async fn list_all(&self) -> Result<Vec<NamedLocation>, LocationRepositoryError>;
}
