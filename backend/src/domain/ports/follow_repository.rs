//! Port for the follower → author edge store.
use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
        /// One of the users does not exist.
        MissingReference { message: String } => "follow references a missing user: {message}",
    }
}

/// Port for follow edges. The store keeps at most one edge per pair.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create the edge unless it exists; returns whether a row was added.
    async fn insert_if_absent(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Remove the edge if present; returns whether a row was removed.
    async fn delete_if_present(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Whether `follower` follows `author`.
    async fn exists(&self, follower: UserId, author: UserId) -> Result<bool, FollowRepositoryError>;

    /// Every author `follower` follows.
    async fn followed_author_ids(
        &self,
        follower: UserId,
    ) -> Result<Vec<UserId>, FollowRepositoryError>;
}
