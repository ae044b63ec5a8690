//! Gazetteer listing.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::NamedLocation;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// A named place posts can be tagged with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    #[schema(example = "Olin Library")]
    pub name: String,
    #[schema(example = 42.447_898)]
    pub latitude: f64,
    #[schema(example = -76.484_298)]
    pub longitude: f64,
}

impl From<&NamedLocation> for LocationResponse {
    fn from(location: &NamedLocation) -> Self {
        let coordinate = location.coordinate();
        Self {
            name: location.name().to_string(),
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

/// List gazetteer entries in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Gazetteer entries", body = [LocationResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["locations"],
    operation_id = "listLocations",
    security([])
)]
#[get("/locations")]
pub async fn list_locations(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LocationResponse>>> {
    let locations = state.posts_query.list_locations().await?;
    Ok(web::Json(locations.iter().map(LocationResponse::from).collect()))
}
