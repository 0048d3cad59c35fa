//! PostgreSQL-backed `UserRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{NewUser, StoredCredentials, User, UserId, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn find_row(
        &self,
        filter: impl FnOnce(
            users::BoxedQuery<'static, diesel::pg::Pg>,
        ) -> users::BoxedQuery<'static, diesel::pg::Pg>
        + Send,
    ) -> Result<Option<UserRow>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        filter(users::table.into_boxed())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, ""))
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, username: &str) -> UserRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserRepositoryError::connection(message),
        DieselFailure::Query(message) => UserRepositoryError::query(message),
        DieselFailure::UniqueViolation => UserRepositoryError::conflict(username),
        DieselFailure::ForeignKeyViolation => UserRepositoryError::query("constraint violation"),
    }
}

fn to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row.into_user().map_err(UserRepositoryError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let id = *id.as_uuid();
        self.find_row(move |query| query.filter(users::id.eq(id)))
            .await?
            .map(to_user)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserRepositoryError> {
        let username = username.as_str().to_owned();
        self.find_row(move |query| query.filter(users::username.eq(username)))
            .await?
            .map(to_user)
            .transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let username = username.to_owned();
        Ok(self
            .find_row(move |query| query.filter(users::username.eq(username)))
            .await?
            .map(|row| StoredCredentials {
                user_id: UserId::from_uuid(row.id),
                password_hash: row.password_hash,
            }))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: user.username.as_str(),
            password_hash: &user.password_hash,
            is_staff: user.is_staff,
        };
        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, user.username.as_str()))?;
        to_user(stored)
    }
}
