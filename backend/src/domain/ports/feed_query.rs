//! Driving port for reading feeds and post pages.
//!
//! Inbound adapters call this to obtain fully resolved page contexts; they
//! never see repositories.

use async_trait::async_trait;
use pagination::PageNumber;

use crate::domain::{
    Error, FeedFilter, FeedPage, GroupFeed, PostDetail, PostId, ProfileFeed, Viewer,
};

/// Read-side use-cases for the blog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Resolve `filter` and return the requested page.
    async fn build_feed(&self, filter: FeedFilter, page: PageNumber) -> Result<FeedPage, Error>;

    /// The front page: every post.
    async fn home(&self, page: PageNumber) -> Result<FeedPage, Error>;

    /// Posts filed under the group with `slug`.
    async fn group(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error>;

    /// Posts by `username`, plus whether `viewer` follows them.
    async fn profile(
        &self,
        viewer: Viewer,
        username: &str,
        page: PageNumber,
    ) -> Result<ProfileFeed, Error>;

    /// Posts by authors `viewer` follows. Requires login.
    async fn followed(&self, viewer: Viewer, page: PageNumber) -> Result<FeedPage, Error>;

    /// A post with its comments.
    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error>;
}
