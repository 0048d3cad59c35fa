//! Directed "user follows author" edges.
//!
//! Edges are idempotent: following twice leaves one edge and unfollowing a
//! stranger is not an error. Self-follows are refused without complaint.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::Error;
use super::UserId;
use super::ports::FollowRepository;

/// Follow-edge operations over a [`FollowRepository`].
#[derive(Clone)]
pub struct FollowGraph {
    follows: Arc<dyn FollowRepository>,
}

impl FollowGraph {
    /// Wrap the edge store.
    pub fn new(follows: Arc<dyn FollowRepository>) -> Self {
        Self { follows }
    }

    /// Make `follower` follow `author`. Returns whether a new edge was made.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn follow(&self, follower: UserId, author: UserId) -> Result<bool, Error> {
        if follower == author {
            debug!(user = %follower, "ignoring self-follow");
            return Ok(false);
        }
        Ok(self.follows.insert_if_absent(follower, author).await?)
    }

    /// Drop the edge if it exists. Returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn unfollow(&self, follower: UserId, author: UserId) -> Result<bool, Error> {
        Ok(self.follows.delete_if_present(follower, author).await?)
    }

    /// Whether `follower` currently follows `author`.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn is_following(&self, follower: UserId, author: UserId) -> Result<bool, Error> {
        Ok(self.follows.exists(follower, author).await?)
    }

    /// Every author `follower` follows.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn followed_author_ids(&self, follower: UserId) -> Result<BTreeSet<UserId>, Error> {
        let ids = self.follows.followed_author_ids(follower).await?;
        Ok(ids.into_iter().collect())
    }
}
