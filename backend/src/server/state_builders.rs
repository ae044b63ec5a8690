//! Wiring of repositories and domain services into [`HttpState`].

use std::sync::Arc;

use tracing::{info, warn};

use geopost::domain::ports::{
    AuthTokenRepository, LocationRepository, PostRepository, UserRepository,
};
use geopost::domain::{
    AccountService, Error, Gazetteer, GazetteerService, NearestLocationResolver, PostService,
};
use geopost::inbound::http::state::{HttpState, HttpStatePorts};
use geopost::outbound::memory::InMemoryStore;
use geopost::outbound::persistence::{
    DieselAuthTokenRepository, DieselLocationRepository, DieselPostRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Driven adapters for every repository port.
pub(crate) struct Adapters<L, P, U, T> {
    pub locations: Arc<L>,
    pub posts: Arc<P>,
    pub users: Arc<U>,
    pub tokens: Arc<T>,
}

impl Adapters<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    /// Back every port with one shared in-memory store.
    pub(crate) fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            locations: Arc::clone(&store),
            posts: Arc::clone(&store),
            users: Arc::clone(&store),
            tokens: store,
        }
    }
}

/// Seed the gazetteer when asked, load it, and build the handler state.
///
/// The loaded gazetteer is fixed for the lifetime of the returned state.
pub(crate) async fn assemble<L, P, U, T>(
    adapters: Adapters<L, P, U, T>,
    config: &ServerConfig,
) -> Result<HttpState, Error>
where
    L: LocationRepository + 'static,
    P: PostRepository + 'static,
    U: UserRepository + 'static,
    T: AuthTokenRepository + 'static,
{
    let Adapters {
        locations,
        posts,
        users,
        tokens,
    } = adapters;

    let gazetteer_service = GazetteerService::new(locations);
    if let Some(seed) = &config.seed {
        gazetteer_service.reseed(seed).await?;
    }
    let gazetteer: Gazetteer = gazetteer_service.load().await?;
    if gazetteer.is_empty() {
        warn!("gazetteer is empty; post creation and lookups will return not found");
    }

    let resolver = NearestLocationResolver::new(Arc::new(gazetteer));
    let post_service = Arc::new(PostService::new(resolver, posts));
    let account_service = Arc::new(AccountService::new(users, tokens, config.token_ttl));

    Ok(HttpState::new(HttpStatePorts {
        posts: post_service.clone(),
        posts_query: post_service,
        accounts: account_service.clone(),
        tokens: account_service,
    })
    .with_require_auth(config.require_auth))
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    match &config.db_pool {
        Some(pool) => {
            info!(backend = "postgres", "assembling application state");
            let adapters = Adapters {
                locations: Arc::new(DieselLocationRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool.clone())),
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
            };
            assemble(adapters, config).await
        }
        None => {
            info!(backend = "memory", "assembling application state");
            assemble(Adapters::in_memory(InMemoryStore::new()), config).await
        }
    }
}
