//! Driving port for authenticated mutations: posting, editing, commenting,
//! and following.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CommentForm, Error, GroupSummary, InvalidForm, PostForm, PostId, RouteTarget, Viewer,
};

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<F> {
    /// The change was applied (or silently refused); go here next.
    Redirect(RouteTarget),
    /// Nothing was written; show the form again with these errors.
    Invalid(InvalidForm<F>),
}

/// Data needed to render the post authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostFormContext {
    /// Current field values.
    pub form: PostForm,
    /// Groups the post may be filed under.
    pub groups: Vec<GroupSummary>,
    /// Whether an existing post is being edited.
    pub is_edit: bool,
    /// The post being edited.
    pub post_id: Option<PostId>,
}

/// Result of asking for an authoring form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPage {
    /// Render the form.
    Show(PostFormContext),
    /// The viewer may not use this form; go here instead.
    Redirect(RouteTarget),
}

/// Write-side use-cases. Each call takes the acting viewer explicitly.
///
/// Anonymous viewers get [`crate::domain::ErrorCode::Unauthorized`]; unknown
/// posts or authors get [`crate::domain::ErrorCode::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContributionCommand: Send + Sync {
    /// An empty authoring form.
    async fn new_post_form(&self, viewer: Viewer) -> Result<PostFormContext, Error>;

    /// Publish a post authored by `viewer`.
    async fn create_post(&self, viewer: Viewer, form: PostForm) -> Result<Outcome<PostForm>, Error>;

    /// The edit form prefilled from `post_id`, or a redirect for non-authors.
    async fn edit_post_form(&self, viewer: Viewer, post_id: PostId) -> Result<FormPage, Error>;

    /// Update `post_id` in place if the viewer may edit it.
    async fn edit_post(
        &self,
        viewer: Viewer,
        post_id: PostId,
        form: PostForm,
    ) -> Result<Outcome<PostForm>, Error>;

    /// Comment on `post_id`.
    async fn add_comment(
        &self,
        viewer: Viewer,
        post_id: PostId,
        form: CommentForm,
    ) -> Result<Outcome<CommentForm>, Error>;

    /// Follow the author called `username`.
    async fn follow(&self, viewer: Viewer, username: &str) -> Result<RouteTarget, Error>;

    /// Stop following the author called `username`.
    async fn unfollow(&self, viewer: Viewer, username: &str) -> Result<RouteTarget, Error>;
}
