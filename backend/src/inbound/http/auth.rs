//! Bearer token extraction for HTTP handlers.
//!
//! [`BearerAuth`] reads `Authorization: Bearer <token>` and resolves the
//! owning user through the [`TokenVerifier`](crate::domain::ports::TokenVerifier)
//! port held in [`HttpState`]. A presented token is always verified; an
//! absent one is only an error when the state requires authentication.

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{BearerToken, Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "Bearer";

fn malformed_header() -> Error {
    Error::unauthorized("authorization header must use the Bearer scheme")
}

fn presented_token(req: &HttpRequest) -> Result<Option<BearerToken>, Error> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value.to_str().map_err(|_| malformed_header())?;
    let (scheme, token) = raw.trim().split_once(' ').ok_or_else(malformed_header)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(malformed_header());
    }
    Ok(Some(BearerToken::from_presented(token)))
}

/// Identity established from a bearer token, if one was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerAuth(Option<UserId>);

impl BearerAuth {
    /// User owning the presented token.
    pub fn user_id(&self) -> Option<&UserId> {
        self.0.as_ref()
    }
}

impl FromRequest for BearerAuth {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = presented_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            match token? {
                Some(token) => state.tokens.verify(&token).await.map(|id| Self(Some(id))),
                None if state.require_auth => Err(Error::unauthorized("bearer token required")),
                None => Ok(Self(None)),
            }
        })
    }
}
