//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{MockAccountCommand, MockPostCommand, MockPostQuery, MockTokenVerifier};
use crate::domain::{LocationName, Post, PostContent, PostId, UserId};

use super::configure_api;
use super::state::{HttpState, HttpStatePorts};

pub(crate) const AUTHOR_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Mocks for every driving port, converted into [`HttpState`] once the
/// expectations are set.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub posts: MockPostCommand,
    pub posts_query: MockPostQuery,
    pub accounts: MockAccountCommand,
    pub tokens: MockTokenVerifier,
}

impl MockPorts {
    pub(crate) fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            posts: Arc::new(self.posts),
            posts_query: Arc::new(self.posts_query),
            accounts: Arc::new(self.accounts),
            tokens: Arc::new(self.tokens),
        })
    }
}

pub(crate) fn author_id() -> UserId {
    UserId::new(AUTHOR_ID).expect("fixture user id")
}

/// A post at "Olin Library" created at 2024-03-01 12:30:00 UTC.
pub(crate) fn sample_post(id: i64, likes: u64) -> Post {
    Post {
        id: PostId::new(id).expect("positive id"),
        user_id: author_id(),
        location_name: LocationName::new("Olin Library").expect("valid name"),
        content: PostContent::new("quiet floor is packed").expect("valid content"),
        likes,
        created_at: Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Application serving the `/api/v1` routes over `state`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure_api)
}
