//! Edit permission checks.

use super::{Post, Viewer};

/// Decides whether a viewer may edit a post.
///
/// The workflow only ever asks this capability; swapping the policy (for
/// example to let staff edit anything) needs no change elsewhere.
#[cfg_attr(test, mockall::automock)]
pub trait EditPolicy: Send + Sync {
    /// Return `true` when `viewer` may change `post`.
    fn can_edit(&self, viewer: &Viewer, post: &Post) -> bool;
}

/// Only the author of a post may edit it.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorOnly;

impl EditPolicy for AuthorOnly {
    fn can_edit(&self, viewer: &Viewer, post: &Post) -> bool {
        viewer.user_id() == Some(post.author.id)
    }
}
