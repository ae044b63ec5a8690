//! Port for post persistence.

use async_trait::async_trait;

use crate::domain::{LocationName, NewPost, Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The author referenced by a new post does not exist.
        UnknownUser { user_id: String } => "user {user_id} does not exist",
    }
}

/// Storage contract for posts.
///
/// `increment_likes` must be atomic with respect to concurrent callers: `N`
/// increments always raise the counter by exactly `N`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and return it with its storage-assigned id.
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError>;

    /// Posts tagged with `location`, oldest first.
    async fn list_by_location(
        &self,
        location: &LocationName,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    /// Add one like and return the updated post, or `None` when it is missing.
    async fn increment_likes(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Delete a post and return the removed row, or `None` when it is missing.
    async fn delete(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unknown_user_error_names_the_user() {
        let err = PostRepositoryError::unknown_user("3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert!(err.to_string().contains("3fa85f64"));
    }
}
