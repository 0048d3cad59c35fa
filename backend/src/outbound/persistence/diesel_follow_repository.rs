//! PostgreSQL-backed `FollowRepository`.
//!
//! The `(user_id, author_id)` primary key enforces one edge per pair;
//! inserts use `ON CONFLICT DO NOTHING` so concurrent follows stay
//! idempotent.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{FollowRepository, FollowRepositoryError};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::FollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel-backed implementation of the [`FollowRepository`] port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    FollowRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => FollowRepositoryError::connection(message),
        DieselFailure::Query(message) => FollowRepositoryError::query(message),
        DieselFailure::UniqueViolation => FollowRepositoryError::query("constraint violation"),
        DieselFailure::ForeignKeyViolation => {
            FollowRepositoryError::missing_reference("follower or author does not exist")
        }
    }
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert_if_absent(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(follows::table)
            .values(FollowRow {
                user_id: *follower.as_uuid(),
                author_id: *author.as_uuid(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn delete_if_present(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(follows::table.find((*follower.as_uuid(), *author.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn exists(&self, follower: UserId, author: UserId) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            follows::table.find((*follower.as_uuid(), *author.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn followed_author_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<Uuid> = follows::table
            .filter(follows::user_id.eq(*follower.as_uuid()))
            .order(follows::author_id.asc())
            .select(follows::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(UserId::from_uuid).collect())
    }
}
