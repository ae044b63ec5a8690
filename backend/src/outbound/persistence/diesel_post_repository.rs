//! PostgreSQL-backed `PostRepository`.
//!
//! Likes are incremented with a single `UPDATE ... RETURNING`, which
//! PostgreSQL serialises per row, so concurrent likes are never lost.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{LocationName, NewPost, Post, PostContent, PostId, UserId};

use super::diesel_basic_error_mapping::{
    is_foreign_key_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of [`PostRepository`].
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let invalid = |what: &str, err: &dyn std::fmt::Display| {
        PostRepositoryError::query(format!("stored post {} has invalid {what}: {err}", row.id))
    };
    Ok(Post {
        id: PostId::new(row.id).map_err(|err| invalid("id", &err))?,
        user_id: UserId::from(row.user_id),
        location_name: LocationName::new(row.location_name.clone())
            .map_err(|err| invalid("location name", &err))?,
        content: PostContent::new(row.content.clone()).map_err(|err| invalid("content", &err))?,
        likes: u64::try_from(row.likes).map_err(|err| invalid("likes", &err))?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            user_id: *post.user_id.as_uuid(),
            location_name: post.location_name.as_ref(),
            content: post.content.as_ref(),
            created_at: post.created_at,
        };

        let stored: PostRow = diesel::insert_into(posts::table)
            .values(&row)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    PostRepositoryError::unknown_user(post.user_id.to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_post(stored)
    }

    async fn list_by_location(
        &self,
        location: &LocationName,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PostRow> = posts::table
            .filter(posts::location_name.eq(location.as_ref()))
            .order(posts::id.asc())
            .select(PostRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }

    async fn increment_likes(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated: Option<PostRow> = diesel::update(posts::table.find(id.get()))
            .set(posts::likes.eq(posts::likes + 1))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        updated.map(row_to_post).transpose()
    }

    async fn delete(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted: Option<PostRow> = diesel::delete(posts::table.find(id.get()))
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        deleted.map(row_to_post).transpose()
    }
}
