//! Driving port for staff-only moderation of groups and posts.

use async_trait::async_trait;
use pagination::PageNumber;

use crate::domain::{Error, FeedPage, Group, GroupForm, GroupId, Post, PostId, Viewer};

use super::PostSearch;

/// Staff use-cases. Anonymous callers get `Unauthorized`; logged-in
/// non-staff callers get `Forbidden`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminCommand: Send + Sync {
    /// Groups ordered by id, optionally filtered by title.
    async fn list_groups(&self, viewer: Viewer, search: Option<String>)
    -> Result<Vec<Group>, Error>;

    /// Create a group. Invalid input or a taken slug is `InvalidRequest`
    /// with the form echoed in the details.
    async fn create_group(&self, viewer: Viewer, form: GroupForm) -> Result<Group, Error>;

    /// Replace a group's fields.
    async fn update_group(&self, viewer: Viewer, id: GroupId, form: GroupForm)
    -> Result<Group, Error>;

    /// Delete a group; its posts stay, without a group.
    async fn delete_group(&self, viewer: Viewer, id: GroupId) -> Result<(), Error>;

    /// Search posts by text and publication day.
    async fn list_posts(
        &self,
        viewer: Viewer,
        search: PostSearch,
        page: PageNumber,
    ) -> Result<FeedPage, Error>;

    /// Refile a post under `group` (or none).
    async fn set_post_group(
        &self,
        viewer: Viewer,
        post_id: PostId,
        group: Option<GroupId>,
    ) -> Result<Post, Error>;
}
