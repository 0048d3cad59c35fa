//! Feed building: filtered, ordered, paginated post listings and the page
//! contexts built on top of them.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageNumber, Paginator};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::ports::{FeedQuery, PostFilter, StorePorts};
use super::{
    Comment, Error, FollowGraph, Group, GroupSlug, Post, PostId, User, UserId, UserSummary,
    Username, Viewer,
};

/// One page of posts, newest first.
pub type FeedPage = Page<Post>;

/// Which posts a feed shows, as requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    /// Every post.
    All,
    /// Posts in the group with this slug.
    ByGroup(GroupSlug),
    /// Posts by the author with this username.
    ByAuthor(Username),
    /// Posts by authors this user follows.
    ByFollowed(UserId),
}

/// Context for a group page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupFeed {
    /// The group being shown.
    pub group: Group,
    /// Its posts.
    #[schema(value_type = Object)]
    pub page: FeedPage,
}

/// Context for an author's profile page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFeed {
    /// The author.
    pub author: UserSummary,
    /// Their posts; `page.total_count` is their post count.
    #[schema(value_type = Object)]
    pub page: FeedPage,
    /// Whether the viewer follows the author.
    pub following: bool,
}

/// Context for a single post page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    /// The post.
    pub post: Post,
    /// Its comments, oldest first.
    pub comments: Vec<Comment>,
    /// How many posts the author has published.
    pub author_post_count: usize,
}

/// A [`FeedFilter`] with the group or author it names looked up.
enum FeedScope {
    All,
    Group(Group),
    Author(User),
    Authors(Vec<UserId>),
}

impl FeedScope {
    fn post_filter(&self) -> PostFilter {
        match self {
            Self::All => PostFilter::All,
            Self::Group(group) => PostFilter::Group(group.id),
            Self::Author(author) => PostFilter::Author(author.id()),
            Self::Authors(ids) => PostFilter::Authors(ids.clone()),
        }
    }
}

/// Read-side service implementing [`FeedQuery`].
#[derive(Clone)]
pub struct FeedService {
    store: StorePorts,
    graph: FollowGraph,
    paginator: Paginator,
}

impl FeedService {
    /// Build the service over the storage ports.
    pub fn new(store: StorePorts, paginator: Paginator) -> Self {
        let graph = FollowGraph::new(Arc::clone(&store.follows));
        Self {
            store,
            graph,
            paginator,
        }
    }

    async fn resolve(&self, filter: FeedFilter) -> Result<FeedScope, Error> {
        match filter {
            FeedFilter::All => Ok(FeedScope::All),
            FeedFilter::ByGroup(slug) => self
                .store
                .groups
                .find_by_slug(&slug)
                .await?
                .map(FeedScope::Group)
                .ok_or_else(|| Error::not_found(format!("group {slug} not found"))),
            FeedFilter::ByAuthor(username) => self
                .store
                .users
                .find_by_username(&username)
                .await?
                .map(FeedScope::Author)
                .ok_or_else(|| Error::not_found(format!("author {username} not found"))),
            FeedFilter::ByFollowed(follower) => {
                let authors = self.graph.followed_author_ids(follower).await?;
                Ok(FeedScope::Authors(authors.into_iter().collect()))
            }
        }
    }

    /// Resolve `filter` and fetch one page of it, keeping what was looked up.
    async fn scoped_feed(
        &self,
        filter: FeedFilter,
        page: PageNumber,
    ) -> Result<(FeedScope, FeedPage), Error> {
        let scope = self.resolve(filter).await?;
        let page = self.page_of(&scope.post_filter(), page).await?;
        Ok((scope, page))
    }

    /// Fetch one page of `filter`. Out-of-range pages resolve to a real page.
    pub(crate) async fn page_of(
        &self,
        filter: &PostFilter,
        page: PageNumber,
    ) -> Result<FeedPage, Error> {
        if matches!(filter, PostFilter::Authors(ids) if ids.is_empty()) {
            return Ok(Page::empty());
        }
        let count = self.store.posts.count(filter).await?;
        let window = self.paginator.window(page, count);
        let items = if window.limit() == 0 {
            Vec::new()
        } else {
            self.store
                .posts
                .page(filter, window.offset(), window.limit())
                .await?
        };
        debug!(
            page = window.number(),
            num_pages = window.num_pages(),
            count,
            "built feed page"
        );
        Ok(Page::new(items, window))
    }
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn build_feed(&self, filter: FeedFilter, page: PageNumber) -> Result<FeedPage, Error> {
        let (_, page) = self.scoped_feed(filter, page).await?;
        Ok(page)
    }

    async fn home(&self, page: PageNumber) -> Result<FeedPage, Error> {
        self.build_feed(FeedFilter::All, page).await
    }

    async fn group(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error> {
        let slug = GroupSlug::new(slug)
            .map_err(|_| Error::not_found(format!("group {slug} not found")))?;
        let (FeedScope::Group(group), page) =
            self.scoped_feed(FeedFilter::ByGroup(slug), page).await?
        else {
            return Err(Error::internal("group feed resolved to another scope"));
        };
        Ok(GroupFeed { group, page })
    }

    async fn profile(
        &self,
        viewer: Viewer,
        username: &str,
        page: PageNumber,
    ) -> Result<ProfileFeed, Error> {
        let username = Username::new(username)
            .map_err(|_| Error::not_found(format!("author {username} not found")))?;
        let (FeedScope::Author(author), page) =
            self.scoped_feed(FeedFilter::ByAuthor(username), page).await?
        else {
            return Err(Error::internal("profile feed resolved to another scope"));
        };
        let following = match viewer.user_id() {
            Some(follower) => self.graph.is_following(follower, author.id()).await?,
            None => false,
        };
        Ok(ProfileFeed {
            author: author.summary(),
            page,
            following,
        })
    }

    async fn followed(&self, viewer: Viewer, page: PageNumber) -> Result<FeedPage, Error> {
        let follower = viewer.require()?;
        self.build_feed(FeedFilter::ByFollowed(follower), page).await
    }

    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .store
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))?;
        let comments = self.store.comments.list_for_post(id).await?;
        let author_post_count = self
            .store
            .posts
            .count(&PostFilter::Author(post.author.id))
            .await?;
        Ok(PostDetail {
            post,
            comments,
            author_post_count,
        })
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
