//! Process-local repositories backed by a shared lock.
//!
//! [`InMemoryStore`] implements every driven port over one state guarded by
//! a `tokio::sync::RwLock`. Clones share the same state, so a single store
//! can be handed to the post, account and gazetteer services at once. State
//! is lost on restart.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{
    AuthTokenRepository, AuthTokenRepositoryError, LocationRepository, LocationRepositoryError,
    PostRepository, PostRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    LocationName, NamedLocation, NewPost, Post, PostId, TokenFingerprint, User, UserId,
};

#[derive(Debug)]
struct StoredToken {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, StoredToken>,
    locations: Vec<NamedLocation>,
    posts: BTreeMap<i64, Post>,
    last_post_id: i64,
}

impl StoreState {
    fn username_taken(&self, username: &str) -> bool {
        self.users
            .values()
            .any(|user| user.username().as_ref() == username)
    }

    fn next_post_id(&mut self) -> Result<PostId, PostRepositoryError> {
        let next = self
            .last_post_id
            .checked_add(1)
            .ok_or_else(|| PostRepositoryError::query("post id sequence exhausted"))?;
        let id = PostId::new(next).map_err(|err| PostRepositoryError::query(err.to_string()))?;
        self.last_post_id = next;
        Ok(id)
    }
}

/// Shared in-memory backing for every repository port.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored posts.
    pub async fn post_count(&self) -> usize {
        self.state.read().await.posts.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut state = self.state.write().await;
        if state.username_taken(user.username().as_ref()) {
            return Err(UserRepositoryError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        state.users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryStore {
    async fn store(
        &self,
        fingerprint: &TokenFingerprint,
        user_id: &UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut state = self.state.write().await;
        state.tokens.retain(|_, token| token.expires_at > Utc::now());
        state.tokens.insert(
            fingerprint.as_str().to_owned(),
            StoredToken {
                user_id: *user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn find_user_for_token(
        &self,
        fingerprint: &TokenFingerprint,
        now: DateTime<Utc>,
    ) -> Result<Option<UserId>, AuthTokenRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .get(fingerprint.as_str())
            .filter(|token| token.expires_at > now)
            .map(|token| token.user_id))
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn replace_all(&self, entries: &[NamedLocation]) -> Result<(), LocationRepositoryError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = entries
            .iter()
            .find(|entry| !seen.insert(entry.name().as_ref()))
        {
            return Err(LocationRepositoryError::query(format!(
                "duplicate location name {}",
                duplicate.name()
            )));
        }
        self.state.write().await.locations = entries.to_vec();
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<NamedLocation>, LocationRepositoryError> {
        Ok(self.state.read().await.locations.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(post.user_id.as_uuid()) {
            return Err(PostRepositoryError::unknown_user(post.user_id.to_string()));
        }
        let id = state.next_post_id()?;
        let stored = Post {
            id,
            user_id: post.user_id,
            location_name: post.location_name.clone(),
            content: post.content.clone(),
            likes: 0,
            created_at: post.created_at,
        };
        state.posts.insert(id.get(), stored.clone());
        Ok(stored)
    }

    async fn list_by_location(
        &self,
        location: &LocationName,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .values()
            .filter(|post| &post.location_name == location)
            .cloned()
            .collect())
    }

    async fn increment_likes(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut state = self.state.write().await;
        let Some(post) = state.posts.get_mut(&id.get()) else {
            return Ok(None);
        };
        post.likes = post
            .likes
            .checked_add(1)
            .ok_or_else(|| PostRepositoryError::query(format!("like counter overflow on {id}")))?;
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        Ok(self.state.write().await.posts.remove(&id.get()))
    }
}
