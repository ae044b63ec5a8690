//! Driving port for read-only post and gazetteer queries.

use async_trait::async_trait;

use crate::domain::{Coordinate, Error, NamedLocation, Post};

/// Posts tagged with the location nearest to a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyPosts {
    pub location: NamedLocation,
    pub posts: Vec<Post>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// Resolve `point` to its nearest location and list that location's posts.
    async fn posts_near(&self, point: Coordinate) -> Result<NearbyPosts, Error>;

    /// Every gazetteer entry in insertion order.
    async fn list_locations(&self) -> Result<Vec<NamedLocation>, Error>;
}
