//! PostgreSQL-backed `LocationRepository`.
//!
//! Reseeding deletes every row and inserts the new list inside a single
//! transaction, so readers never observe a partial gazetteer.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::NamedLocation;
use crate::domain::ports::{LocationRepository, LocationRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{LocationRow, NewLocationRow};
use super::pool::{DbPool, PoolError};
use super::schema::locations;

/// Diesel-backed implementation of [`LocationRepository`].
#[derive(Clone)]
pub struct DieselLocationRepository {
    pool: DbPool,
}

impl DieselLocationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LocationRepositoryError {
    map_basic_pool_error(error, LocationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> LocationRepositoryError {
    map_basic_diesel_error(
        error,
        LocationRepositoryError::query,
        LocationRepositoryError::connection,
    )
}

fn row_to_location(row: LocationRow) -> Result<NamedLocation, LocationRepositoryError> {
    NamedLocation::try_from_parts(row.name, row.latitude, row.longitude)
        .map_err(|err| LocationRepositoryError::invalid_row(err.to_string()))
}

#[async_trait]
impl LocationRepository for DieselLocationRepository {
    async fn replace_all(&self, entries: &[NamedLocation]) -> Result<(), LocationRepositoryError> {
        let rows: Vec<NewLocationRow<'_>> = entries
            .iter()
            .map(|entry| NewLocationRow {
                name: entry.name().as_ref(),
                latitude: entry.coordinate().latitude(),
                longitude: entry.coordinate().longitude(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::delete(locations::table).execute(conn).await?;
                if !rows.is_empty() {
                    diesel::insert_into(locations::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<NamedLocation>, LocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LocationRow> = locations::table
            .order(locations::id.asc())
            .select(LocationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_location).collect()
    }
}
