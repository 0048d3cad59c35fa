//! Port for group persistence.
use async_trait::async_trait;

use crate::domain::{Group, GroupDraft, GroupId, GroupSlug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "group repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "group repository query failed: {message}",
        /// Another group already uses the slug.
        Conflict { slug: String } => "group slug already in use: {slug}",
    }
}

/// Port for reading and administering groups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Look a group up by its slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError>;

    /// Look a group up by id.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    /// List groups ordered by id, optionally keeping only titles containing
    /// `search` (case-insensitive).
    async fn list(&self, search: Option<String>) -> Result<Vec<Group>, GroupRepositoryError>;

    /// Create a group.
    async fn insert(&self, draft: &GroupDraft) -> Result<Group, GroupRepositoryError>;

    /// Replace a group's fields; `None` when the group does not exist.
    async fn update(
        &self,
        id: GroupId,
        draft: &GroupDraft,
    ) -> Result<Option<Group>, GroupRepositoryError>;

    /// Delete a group, clearing the group of every post filed under it.
    /// Returns whether a row was removed.
    async fn delete(&self, id: GroupId) -> Result<bool, GroupRepositoryError>;
}
