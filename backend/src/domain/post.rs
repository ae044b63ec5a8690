//! Posts and their validated inputs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::gazetteer::LocationName;
use super::user::UserId;

/// Maximum post length in characters.
pub const POST_CONTENT_MAX: usize = 1000;

/// Validation errors for post inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("post content must not be empty")]
    EmptyContent,
    #[error("post content must be at most {max} characters")]
    ContentTooLong { max: usize },
    #[error("post id must be a positive integer")]
    InvalidId,
}

/// Storage-assigned post identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PostId(i64);

impl PostId {
    pub fn new(id: i64) -> Result<Self, PostValidationError> {
        if id <= 0 {
            return Err(PostValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PostId> for i64 {
    fn from(value: PostId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for PostId {
    type Error = PostValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Free-text post body: non-blank, at most [`POST_CONTENT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    pub fn new(content: impl Into<String>) -> Result<Self, PostValidationError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if content.chars().count() > POST_CONTENT_MAX {
            return Err(PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX,
            });
        }
        Ok(Self(content))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A stored post.
///
/// ## Invariants
/// - `location_name` was resolved once at creation and is never
///   re-resolved.
/// - `likes` only ever increases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub location_name: LocationName,
    pub content: PostContent,
    pub likes: u64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a post whose location is already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub user_id: UserId,
    pub location_name: LocationName,
    pub content: PostContent,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   \n\t")]
    fn blank_content_is_rejected(#[case] raw: &str) {
        assert_eq!(
            PostContent::new(raw).expect_err("blank content"),
            PostValidationError::EmptyContent
        );
    }

    #[rstest]
    fn content_length_counts_characters() {
        let at_limit = "é".repeat(POST_CONTENT_MAX);
        assert!(PostContent::new(at_limit).is_ok());
        let over = "é".repeat(POST_CONTENT_MAX + 1);
        assert_eq!(
            PostContent::new(over).expect_err("too long"),
            PostValidationError::ContentTooLong {
                max: POST_CONTENT_MAX
            }
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_ids_are_rejected(#[case] raw: i64) {
        assert_eq!(PostId::new(raw), Err(PostValidationError::InvalidId));
    }
}
