//! Posts API handlers.
//!
//! ```text
//! GET    /api/v1/posts?latitude=42.4473&longitude=-76.4843
//! POST   /api/v1/posts {"latitude":42.4473,"longitude":-76.4843,"content":"hi","user_id":"..."}
//! POST   /api/v1/posts/{id}/like
//! DELETE /api/v1/posts/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreatePostRequest;
use crate::domain::{Error, Post};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    CONTENT, LATITUDE, LONGITUDE, USER_ID, coordinate, number_from_json, parse_content,
    parse_number, parse_post_id, parse_user_id, require,
};

/// Timestamp layout used for `createdAt` in post payloads (UTC).
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Post payload returned by every posts endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[schema(example = 17)]
    pub id: i64,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(example = "Olin Library")]
    pub location_name: String,
    pub content: String,
    pub likes: u64,
    #[schema(example = "2024-03-01 12:30:00")]
    pub created_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.get(),
            user_id: post.user_id.to_string(),
            location_name: post.location_name.to_string(),
            content: post.content.into(),
            likes: post.likes,
            created_at: post.created_at.format(CREATED_AT_FORMAT).to_string(),
        }
    }
}

/// Query string for `GET /api/v1/posts`.
///
/// Values stay textual so non-numeric input is reported per field.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyPostsQuery {
    /// Latitude in decimal degrees.
    #[param(value_type = f64, example = 42.4473)]
    pub latitude: Option<String>,
    /// Longitude in decimal degrees.
    #[param(value_type = f64, example = -76.4843)]
    pub longitude: Option<String>,
}

/// Response body for `GET /api/v1/posts`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPostsResponse {
    /// Gazetteer entry the query point resolved to.
    pub location_name: String,
    pub posts: Vec<PostResponse>,
}

/// Request body for `POST /api/v1/posts`.
///
/// Coordinates may be JSON numbers or numeric strings.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreatePostBody {
    #[schema(value_type = f64, example = 42.4473)]
    pub latitude: Option<Value>,
    #[schema(value_type = f64, example = -76.4843)]
    pub longitude: Option<Value>,
    pub content: Option<String>,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: Option<String>,
}

impl TryFrom<CreatePostBody> for CreatePostRequest {
    type Error = Error;

    fn try_from(body: CreatePostBody) -> Result<Self, Self::Error> {
        let latitude = require(body.latitude, LATITUDE)?;
        let longitude = require(body.longitude, LONGITUDE)?;
        let content = require(body.content, CONTENT)?;
        let user_id = require(body.user_id, USER_ID)?;

        let coordinate = coordinate(
            number_from_json(&latitude, LATITUDE)?,
            number_from_json(&longitude, LONGITUDE)?,
        )?;
        Ok(Self {
            user_id: parse_user_id(&user_id)?,
            coordinate,
            content: parse_content(content)?,
        })
    }
}

/// List posts at the location nearest to the query point.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(NearbyPostsQuery),
    responses(
        (status = 200, description = "Posts at the nearest location", body = NearbyPostsResponse),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorSchema),
        (status = 404, description = "No locations are configured", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listNearbyPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    query: web::Query<NearbyPostsQuery>,
) -> ApiResult<web::Json<NearbyPostsResponse>> {
    let NearbyPostsQuery {
        latitude,
        longitude,
    } = query.into_inner();
    let latitude = require(latitude, LATITUDE)?;
    let longitude = require(longitude, LONGITUDE)?;
    let point = coordinate(
        parse_number(&latitude, LATITUDE)?,
        parse_number(&longitude, LONGITUDE)?,
    )?;

    let nearby = state.posts_query.posts_near(point).await?;
    Ok(web::Json(NearbyPostsResponse {
        location_name: nearby.location.name().to_string(),
        posts: nearby.posts.into_iter().map(PostResponse::from).collect(),
    }))
}

/// Create a post tagged with the location nearest to its coordinates.
///
/// When authentication is required the bearer token must belong to
/// `user_id`.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 403, description = "Token does not belong to user_id", body = ErrorSchema),
        (status = 404, description = "No locations are configured", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    auth: BearerAuth,
    payload: web::Json<CreatePostBody>,
) -> ApiResult<HttpResponse> {
    let request = CreatePostRequest::try_from(payload.into_inner())?;
    if auth
        .user_id()
        .is_some_and(|caller| caller != &request.user_id)
    {
        return Err(Error::forbidden("cannot post on behalf of another user"));
    }

    let post = state.posts.create_post(request).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Add one like to a post.
///
/// The `BearerAuth` extractor enforces the token policy.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post with its updated like count", body = PostResponse),
        (status = 400, description = "Invalid post id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "likePost"
)]
#[post("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<HttpState>,
    _auth: BearerAuth,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(path.into_inner())?;
    let post = state.posts.like_post(id).await?;
    Ok(web::Json(PostResponse::from(post)))
}

/// Delete a post and return it.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = i64, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Deleted post", body = PostResponse),
        (status = 400, description = "Invalid post id", body = ErrorSchema),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorSchema),
        (status = 404, description = "Post not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    _auth: BearerAuth,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(path.into_inner())?;
    let post = state.posts.delete_post(id).await?;
    Ok(web::Json(PostResponse::from(post)))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
