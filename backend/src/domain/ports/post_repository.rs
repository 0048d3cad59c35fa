//! Port for post persistence and ordered feed reads.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{GroupId, NewPost, Post, PostDraft, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
        /// The author or group referenced by the write does not exist.
        MissingReference { message: String } => "post references a missing row: {message}",
    }
}

/// Administrative post search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearch {
    /// Keep posts whose text contains this fragment (case-insensitive).
    pub text: Option<String>,
    /// Keep posts published on this UTC calendar day.
    pub published_on: Option<NaiveDate>,
}

/// Which posts a feed read covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts filed under one group.
    Group(GroupId),
    /// Posts by one author.
    Author(UserId),
    /// Posts by any of several authors; an empty list matches nothing.
    Authors(Vec<UserId>),
    /// Administrative text and date search.
    Search(PostSearch),
}

/// Port for writing posts and reading ordered slices of them.
///
/// Every listing is ordered by `pub_date` descending, ties broken by id
/// descending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Fetch one post with author and group resolved.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Store a new post.
    async fn insert(&self, post: &NewPost) -> Result<Post, PostRepositoryError>;

    /// Replace the content of a post; `None` when it does not exist.
    async fn update(
        &self,
        id: PostId,
        content: &PostDraft,
    ) -> Result<Option<Post>, PostRepositoryError>;

    /// Refile a post under another group (or none).
    async fn set_group(
        &self,
        id: PostId,
        group: Option<GroupId>,
    ) -> Result<Option<Post>, PostRepositoryError>;

    /// Count the posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<usize, PostRepositoryError>;

    /// Read `limit` posts matching `filter` after skipping `offset`.
    async fn page(
        &self,
        filter: &PostFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Post>, PostRepositoryError>;
}
