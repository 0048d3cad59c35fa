//! Comments attached to posts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldErrors, PostId, UserId, UserSummary};

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Identifier.
    pub id: i32,
    /// The post this comment belongs to.
    pub post_id: PostId,
    /// Comment author.
    pub author: UserSummary,
    /// Body text.
    pub text: String,
    /// Creation time.
    pub created: DateTime<Utc>,
}

/// Raw comment fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentForm {
    /// Body text.
    #[schema(example = "Nice post!")]
    pub text: String,
}

impl CommentForm {
    /// Validate and return the trimmed text.
    ///
    /// # Errors
    ///
    /// Returns a `text` field error for blank input.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::default();
        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", "This field is required.");
        }
        errors.into_result(text.to_owned())
    }
}

/// A comment about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Target post.
    pub post_id: PostId,
    /// Comment author.
    pub author: UserId,
    /// Trimmed body text.
    pub text: String,
    /// Server-assigned creation time.
    pub created: DateTime<Utc>,
}
