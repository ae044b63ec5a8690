//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod locations;
pub mod posts;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;
use error::{json_error_handler, path_error_handler, query_error_handler};

/// Register the `/api/v1` routes and extractor error handlers.
///
/// The caller provides [`state::HttpState`] as `web::Data`.
///
/// # Examples
/// ```no_run
/// use actix_web::App;
/// use geopost::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api/v1")
                .service(users::register)
                .service(users::login)
                .service(posts::list_posts)
                .service(posts::create_post)
                .service(posts::like_post)
                .service(posts::delete_post)
                .service(locations::list_locations),
        );
}
