//! Named navigation targets returned by the workflow.
//!
//! Services say *where* to go next; the HTTP adapter turns a target into a
//! concrete path.

use super::{PostId, Username};

/// A named route with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// `home`: the paginated front page.
    Home,
    /// `profile`: an author's posts.
    Profile {
        /// The author's username.
        username: Username,
    },
    /// `post_detail`: a single post with comments.
    PostDetail {
        /// The post to show.
        post_id: PostId,
    },
    /// `follow_index`: posts by followed authors.
    FollowIndex,
}

impl RouteTarget {
    /// The stable route name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Profile { .. } => "profile",
            Self::PostDetail { .. } => "post_detail",
            Self::FollowIndex => "follow_index",
        }
    }

    /// Shorthand for [`RouteTarget::Profile`].
    #[must_use]
    pub fn profile(username: &Username) -> Self {
        Self::Profile {
            username: username.clone(),
        }
    }

    /// Shorthand for [`RouteTarget::PostDetail`].
    #[must_use]
    pub const fn post_detail(post_id: PostId) -> Self {
        Self::PostDetail { post_id }
    }
}
