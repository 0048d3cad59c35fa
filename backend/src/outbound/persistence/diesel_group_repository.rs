//! PostgreSQL-backed `GroupRepository`.
//!
//! Deleting a group relies on the `ON DELETE SET NULL` foreign key to
//! detach its posts.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{Group, GroupDraft, GroupId, GroupSlug};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::diesel_helpers::contains_pattern;
use super::models::{GroupChanges, GroupRow};
use super::pool::{DbPool, PoolError};
use super::schema::groups;

/// Diesel-backed implementation of the [`GroupRepository`] port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    GroupRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, slug: &GroupSlug) -> GroupRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => GroupRepositoryError::connection(message),
        DieselFailure::Query(message) => GroupRepositoryError::query(message),
        DieselFailure::UniqueViolation => GroupRepositoryError::conflict(slug.as_str()),
        DieselFailure::ForeignKeyViolation => GroupRepositoryError::query("constraint violation"),
    }
}

fn map_read_error(error: diesel::result::Error) -> GroupRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => GroupRepositoryError::connection(message),
        DieselFailure::Query(message) => GroupRepositoryError::query(message),
        DieselFailure::UniqueViolation | DieselFailure::ForeignKeyViolation => {
            GroupRepositoryError::query("constraint violation")
        }
    }
}

fn to_group(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    row.into_group().map_err(GroupRepositoryError::query)
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(to_group)
            .transpose()
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .find(id.get())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?
            .map(to_group)
            .transpose()
    }

    async fn list(&self, search: Option<String>) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = groups::table.into_boxed();
        if let Some(term) = search {
            query = query.filter(groups::title.ilike(contains_pattern(&term)));
        }
        let rows: Vec<GroupRow> = query
            .order(groups::id.asc())
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        rows.into_iter().map(to_group).collect()
    }

    async fn insert(&self, draft: &GroupDraft) -> Result<Group, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: GroupRow = diesel::insert_into(groups::table)
            .values(GroupChanges::from(draft))
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, &draft.slug))?;
        to_group(row)
    }

    async fn update(
        &self,
        id: GroupId,
        draft: &GroupDraft,
    ) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(groups::table.find(id.get()))
            .set(GroupChanges::from(draft))
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, &draft.slug))?
            .map(to_group)
            .transpose()
    }

    async fn delete(&self, id: GroupId) -> Result<bool, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(groups::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }
}
