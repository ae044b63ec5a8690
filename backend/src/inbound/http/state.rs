//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see domain
//! ports, so handler tests can swap in mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, PostCommand, PostQuery, TokenVerifier};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub tokens: Arc<dyn TokenVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<dyn PostCommand>,
    pub posts_query: Arc<dyn PostQuery>,
    pub accounts: Arc<dyn AccountCommand>,
    pub tokens: Arc<dyn TokenVerifier>,
    /// Whether post mutations demand a bearer token.
    pub require_auth: bool,
}

impl HttpState {
    /// Construct state from a ports bundle with authentication optional.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            posts,
            posts_query,
            accounts,
            tokens,
        } = ports;
        Self {
            posts,
            posts_query,
            accounts,
            tokens,
            require_auth: false,
        }
    }

    /// Require a bearer token on post mutations.
    #[must_use]
    pub fn with_require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }
}
