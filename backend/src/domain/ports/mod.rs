//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the feed cache) are implemented by outbound
//! adapters; driving ports (queries and commands) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_command;
mod comment_repository;
mod contribution_command;
mod feed_cache;
mod feed_query;
mod follow_repository;
mod group_repository;
mod login_service;
mod post_repository;
mod user_repository;

use std::sync::Arc;

#[cfg(test)]
pub use admin_command::MockAdminCommand;
pub use admin_command::AdminCommand;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use contribution_command::MockContributionCommand;
pub use contribution_command::{ContributionCommand, FormPage, Outcome, PostFormContext};
#[cfg(test)]
pub use feed_cache::MockFeedCache;
pub use feed_cache::{DisabledFeedCache, FeedCache, FeedCacheError};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::FeedQuery;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostFilter, PostRepository, PostRepositoryError, PostSearch};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};

/// The full set of driven storage ports, shared by the domain services.
///
/// Both storage adapters hand out one of these, so services are wired the
/// same way whichever backend is configured.
#[derive(Clone)]
pub struct StorePorts {
    /// User accounts.
    pub users: Arc<dyn UserRepository>,
    /// Groups.
    pub groups: Arc<dyn GroupRepository>,
    /// Posts.
    pub posts: Arc<dyn PostRepository>,
    /// Comments.
    pub comments: Arc<dyn CommentRepository>,
    /// Follow edges.
    pub follows: Arc<dyn FollowRepository>,
}

impl StorePorts {
    /// Bundle one adapter value that implements every repository port.
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + GroupRepository
            + PostRepository
            + CommentRepository
            + FollowRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }
}

#[cfg(test)]
mod tests;
