//! Correlation id shared by a request's log lines, error bodies and the
//! `trace-id` response header.
//!
//! The id lives in a tokio task-local set by the `Trace` middleware, so
//! [`Error`](crate::domain::Error) constructors pick it up on their own.
//! Work moved onto another task must re-enter it with [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept a caller's id and to echo the active one.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    pub(crate) static TRACE_ID: TraceId;
}

/// UUID identifying one request.
///
/// # Examples
/// ```
/// use geopost::TraceId;
///
/// let supplied = TraceId::for_request(Some("6f1c1a8e-2d4b-4c1e-9a57-0c1b2d3e4f50"));
/// assert_eq!(supplied.to_string(), "6f1c1a8e-2d4b-4c1e-9a57-0c1b2d3e4f50");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt a caller-supplied id when it is a non-nil UUID, otherwise mint
    /// a fresh one.
    #[must_use]
    pub fn for_request(supplied: Option<&str>) -> Self {
        supplied
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// The id in scope for the running task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
