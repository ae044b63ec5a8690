//! Post domain services.
//!
//! [`PostService`] implements the post driving ports on top of a
//! [`NearestLocationResolver`] and a [`PostRepository`]. Locations are
//! resolved before anything is written, so a failed resolution never leaves
//! a row behind.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CreatePostRequest, NearbyPosts, PostCommand, PostQuery, PostRepository, PostRepositoryError,
};
use crate::domain::{
    Coordinate, Error, NamedLocation, NearestLocationResolver, NewPost, Post, PostId,
    ResolveError, Resolution,
};

fn map_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
        PostRepositoryError::UnknownUser { user_id } => {
            Error::invalid_request(format!("user {user_id} does not exist")).with_details(json!({
                "field": "user_id",
                "code": "unknown_user",
            }))
        }
    }
}

fn map_resolve_error(error: ResolveError) -> Error {
    match error {
        ResolveError::EmptyGazetteer => Error::not_found("no locations are available")
            .with_details(json!({ "code": "no_locations" })),
    }
}

fn post_not_found(id: PostId) -> Error {
    Error::not_found(format!("post {id} not found")).with_details(json!({ "postId": id.get() }))
}

/// Post service implementing [`PostCommand`] and [`PostQuery`].
#[derive(Clone)]
pub struct PostService<P> {
    resolver: NearestLocationResolver,
    posts: Arc<P>,
}

impl<P> PostService<P> {
    /// Create a service resolving against `resolver` and storing in `posts`.
    pub fn new(resolver: NearestLocationResolver, posts: Arc<P>) -> Self {
        Self { resolver, posts }
    }

    fn resolve(&self, point: &Coordinate) -> Result<Resolution<'_>, Error> {
        let resolution = self.resolver.resolve(point).map_err(map_resolve_error)?;
        debug!(
            query = %point,
            location = %resolution.location.name(),
            distance_km = resolution.distance_km,
            "resolved nearest location"
        );
        Ok(resolution)
    }
}

#[async_trait]
impl<P> PostCommand for PostService<P>
where
    P: PostRepository,
{
    async fn create_post(&self, request: CreatePostRequest) -> Result<Post, Error> {
        let location_name = self
            .resolve(&request.coordinate)?
            .location
            .name()
            .clone();

        let new_post = NewPost {
            user_id: request.user_id,
            location_name,
            content: request.content,
            created_at: Utc::now(),
        };
        let post = self
            .posts
            .create(&new_post)
            .await
            .map_err(map_repository_error)?;

        info!(
            post_id = post.id.get(),
            user_id = %post.user_id,
            location = %post.location_name,
            "post created"
        );
        Ok(post)
    }

    async fn like_post(&self, id: PostId) -> Result<Post, Error> {
        let post = self
            .posts
            .increment_likes(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| post_not_found(id))?;

        debug!(post_id = id.get(), likes = post.likes, "post liked");
        Ok(post)
    }

    async fn delete_post(&self, id: PostId) -> Result<Post, Error> {
        let post = self
            .posts
            .delete(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| post_not_found(id))?;

        info!(post_id = id.get(), "post deleted");
        Ok(post)
    }
}

#[async_trait]
impl<P> PostQuery for PostService<P>
where
    P: PostRepository,
{
    async fn posts_near(&self, point: Coordinate) -> Result<NearbyPosts, Error> {
        let location = self.resolve(&point)?.location.clone();
        let posts = self
            .posts
            .list_by_location(location.name())
            .await
            .map_err(map_repository_error)?;
        Ok(NearbyPosts { location, posts })
    }

    async fn list_locations(&self) -> Result<Vec<NamedLocation>, Error> {
        Ok(self.resolver.gazetteer().list_all().to_vec())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
