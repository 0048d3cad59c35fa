//! Thematic groups that posts can be filed under.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::FieldErrors;
use super::slug::{SLUG_MAX, is_valid_slug};

/// Maximum group title length.
pub const GROUP_TITLE_MAX: usize = 200;

/// Database identifier of a group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct GroupId(i32);

impl GroupId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Errors raised when parsing a [`GroupSlug`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupSlugError {
    /// The slug was blank, too long, or used characters outside `[a-z0-9_-]`.
    #[error("slug must be 1-{SLUG_MAX} lowercase letters, digits, hyphens, or underscores")]
    Invalid,
}

/// URL-safe unique group key.
///
/// # Examples
/// ```
/// use blog::domain::GroupSlug;
///
/// assert!(GroupSlug::new("cats").is_ok());
/// assert!(GroupSlug::new("Cats!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "cats")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    ///
    /// # Errors
    ///
    /// Returns [`GroupSlugError::Invalid`] for malformed input.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupSlugError> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(GroupSlugError::Invalid)
        }
    }

    /// Borrow the slug text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupSlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A stored group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Identifier.
    pub id: GroupId,
    /// Display title.
    pub title: String,
    /// Unique URL key.
    pub slug: GroupSlug,
    /// Free-form description.
    pub description: String,
}

impl Group {
    /// Short reference embedded in posts.
    #[must_use]
    pub fn summary(&self) -> GroupSummary {
        GroupSummary {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// Group reference embedded in posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Identifier.
    pub id: GroupId,
    /// Display title.
    pub title: String,
    /// Unique URL key.
    pub slug: GroupSlug,
}

/// Raw group fields as submitted to the admin endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupForm {
    /// Display title.
    #[schema(example = "Cats")]
    pub title: String,
    /// Requested slug.
    #[schema(example = "cats")]
    pub slug: String,
    /// Description; may be empty.
    pub description: String,
}

impl GroupForm {
    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for every failing field.
    pub fn validate(&self) -> Result<GroupDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "This field is required.");
        } else if title.chars().count() > GROUP_TITLE_MAX {
            errors.add(
                "title",
                format!("Ensure this value has at most {GROUP_TITLE_MAX} characters."),
            );
        }
        let slug = GroupSlug::new(self.slug.trim()).map_err(|err| err.to_string());
        if let Err(message) = &slug {
            errors.add("slug", message.clone());
        }
        match slug {
            Ok(slug) if errors.is_empty() => Ok(GroupDraft {
                title: title.to_owned(),
                slug,
                description: self.description.trim().to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

/// Validated group fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDraft {
    /// Display title.
    pub title: String,
    /// Unique URL key.
    pub slug: GroupSlug,
    /// Description.
    pub description: String,
}
