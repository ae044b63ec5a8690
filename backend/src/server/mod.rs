//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, Settings};
#[cfg(feature = "metrics")]
pub(crate) use metrics::make_metrics;

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use geopost::Trace;
#[cfg(debug_assertions)]
use geopost::doc::ApiDoc;
use geopost::inbound::http::configure_api;
use geopost::inbound::http::health::{HealthState, live, ready};
use geopost::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Seeds and loads the gazetteer before binding, so a failing location
/// store stops startup instead of serving an empty resolver.
///
/// # Errors
/// Returns [`std::io::Error`] when assembling application state, binding the
/// socket, or starting the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config)
        .await
        .map(web::Data::new)
        .map_err(|err| std::io::Error::other(format!("failed to assemble state: {err}")))?;
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(server_health_state.clone(), http_state.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use geopost::domain::{Gazetteer, campus_seed};
    use rstest::rstest;
    use serde_json::Value;

    async fn state() -> web::Data<HttpState> {
        let seed = Gazetteer::from_seeds(&campus_seed()).expect("valid seed");
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("literal address"))
            .with_seed(seed);
        web::Data::new(build_http_state(&config).await.expect("state assembles"))
    }

    #[rstest]
    #[actix_rt::test]
    async fn app_serves_locations_and_probes() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let app = test::init_service(build_app(health, state().await)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/v1/locations").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key("trace-id"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body.as_array().map(Vec::len),
            Some(campus_seed().len())
        );

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_rt::test]
    async fn unready_probe_reports_unavailable() {
        let app = test::init_service(build_app(
            web::Data::new(HealthState::new()),
            state().await,
        ))
        .await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
