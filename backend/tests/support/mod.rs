//! Shared harness assembling the HTTP app over the in-memory store.

use std::sync::Arc;

use geopost::domain::{
    AccountService, Gazetteer, GazetteerService, LocationSeed, NearestLocationResolver,
    PostService,
};
use geopost::inbound::http::state::{HttpState, HttpStatePorts};
use geopost::outbound::memory::InMemoryStore;

/// Handler state plus the store behind it, for asserting on side effects.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub state: HttpState,
}

/// Seed `locations`, load them back, and wire every port to one store.
pub async fn harness(locations: &[LocationSeed], require_auth: bool) -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let gazetteer = Gazetteer::from_seeds(locations).expect("valid seed list");
    let gazetteer_service = GazetteerService::new(Arc::clone(&store));
    gazetteer_service
        .reseed(&gazetteer)
        .await
        .expect("reseed succeeds");
    let loaded = gazetteer_service.load().await.expect("load succeeds");

    let posts = Arc::new(PostService::new(
        NearestLocationResolver::new(Arc::new(loaded)),
        Arc::clone(&store),
    ));
    let accounts = Arc::new(AccountService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        chrono::Duration::hours(1),
    ));
    let state = HttpState::new(HttpStatePorts {
        posts: posts.clone(),
        posts_query: posts,
        accounts: accounts.clone(),
        tokens: accounts,
    })
    .with_require_auth(require_auth);

    Harness { store, state }
}

/// Build an initialised test service for `state`, wrapped in `Trace`.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(geopost::Trace)
                .configure(geopost::inbound::http::configure_api),
        )
        .await
    };
}
