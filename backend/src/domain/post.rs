//! Posts and the forms used to author them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FieldErrors, GroupId, GroupSummary, UserId, UserSummary};

/// Database identifier of a post.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct PostId(i32);

impl PostId {
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

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Directory prefix under which post images live.
pub const IMAGE_PREFIX: &str = "posts/";

const IMAGE_EXTENSIONS: [&str; 5] = ["gif", "jpeg", "jpg", "png", "webp"];

/// Errors raised when parsing an [`ImagePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImagePathError {
    /// Blank input.
    #[error("image path must not be empty")]
    Empty,
    /// Absolute paths, parent segments, or unexpected characters.
    #[error("image path must be a relative file name without parent segments")]
    Unsafe,
    /// The file does not look like an image.
    #[error("upload a valid image (gif, jpeg, jpg, png, webp)")]
    NotAnImage,
}

/// Relative media path of a post image, always under [`IMAGE_PREFIX`].
///
/// # Examples
/// ```
/// use blog::domain::ImagePath;
///
/// let path = ImagePath::new("cat.png").unwrap();
/// assert_eq!(path.as_str(), "posts/cat.png");
/// assert!(ImagePath::new("../etc/passwd.png").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "posts/cat.png")]
pub struct ImagePath(String);

impl ImagePath {
    /// Validate a file name or `posts/`-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ImagePathError`] for blank, unsafe, or non-image paths.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ImagePathError> {
        let raw = value.as_ref().trim();
        if raw.is_empty() {
            return Err(ImagePathError::Empty);
        }
        let relative = raw.strip_prefix(IMAGE_PREFIX).unwrap_or(raw);
        let safe = !relative.is_empty()
            && !relative.starts_with('/')
            && relative.split('/').all(|segment| {
                !segment.is_empty()
                    && segment != "."
                    && segment != ".."
                    && segment
                        .chars()
                        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
            });
        if !safe {
            return Err(ImagePathError::Unsafe);
        }
        let is_image = relative
            .rsplit_once('.')
            .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if !is_image {
            return Err(ImagePathError::NotAnImage);
        }
        Ok(Self(format!("{IMAGE_PREFIX}{relative}")))
    }

    /// Borrow the stored path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

impl TryFrom<String> for ImagePath {
    type Error = ImagePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A published post with its author and group resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier.
    pub id: PostId,
    /// Body text.
    pub text: String,
    /// Publication time, assigned on creation.
    pub pub_date: DateTime<Utc>,
    /// Author reference.
    pub author: UserSummary,
    /// Group the post is filed under, if any.
    pub group: Option<GroupSummary>,
    /// Attached image, if any.
    pub image: Option<ImagePath>,
}

impl Post {
    /// Prefill an edit form with the current values.
    #[must_use]
    pub fn to_form(&self) -> PostForm {
        PostForm {
            text: self.text.clone(),
            group: self.group.as_ref().map(|group| group.id.get()),
            image: self.image.clone().map(String::from),
            clear_image: false,
        }
    }
}

/// Raw post fields as submitted by an author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PostForm {
    /// Body text.
    #[schema(example = "Hello, world")]
    pub text: String,
    /// Optional group identifier.
    pub group: Option<i32>,
    /// Optional image file name.
    #[schema(example = "cat.png")]
    pub image: Option<String>,
    /// On edit, drop the stored image. An edit without `image` keeps it.
    pub clear_image: bool,
}

impl PostForm {
    /// Validate the field shapes.
    ///
    /// Whether the referenced group exists is checked by the workflow, which
    /// has access to storage.
    ///
    /// # Errors
    ///
    /// Returns per-field messages for every failing field.
    pub fn validate(&self) -> Result<PostDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", "This field is required.");
        }
        let image = match self.image.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match ImagePath::new(raw) {
                Ok(path) => Some(path),
                Err(err) => {
                    errors.add("image", err.to_string());
                    None
                }
            },
        };
        errors.into_result(PostDraft {
            text: text.to_owned(),
            group: self.group.map(GroupId::new),
            image,
        })
    }
}

/// Validated post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    /// Trimmed, non-empty body text.
    pub text: String,
    /// Group to file the post under.
    pub group: Option<GroupId>,
    /// Attached image.
    pub image: Option<ImagePath>,
}

/// A post about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// The author; always the authenticated caller.
    pub author: UserId,
    /// Server-assigned publication time.
    pub pub_date: DateTime<Utc>,
    /// Content fields.
    pub content: PostDraft,
}
