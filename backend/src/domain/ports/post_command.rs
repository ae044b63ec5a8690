//! Driving port for post mutations.
//!
//! Inbound adapters call this port to create, like, or delete posts without
//! knowing how locations are resolved or where posts are stored.

use async_trait::async_trait;

use crate::domain::{Coordinate, Error, Post, PostContent, PostId, UserId};

/// Validated request to create a post at an arbitrary coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePostRequest {
    pub user_id: UserId,
    pub coordinate: Coordinate,
    pub content: PostContent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Resolve the nearest location and store the post there.
    ///
    /// Returns a `not_found` error and stores nothing when no location can
    /// be resolved.
    async fn create_post(&self, request: CreatePostRequest) -> Result<Post, Error>;

    /// Increment a post's like counter by one.
    async fn like_post(&self, id: PostId) -> Result<Post, Error>;

    /// Delete a post, returning its last state.
    async fn delete_post(&self, id: PostId) -> Result<Post, Error>;
}
