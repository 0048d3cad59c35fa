//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Conversions into domain
//! types re-run domain validation so a hand-edited row surfaces as a query
//! error rather than an invalid entity.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Group, GroupDraft, GroupId, GroupSlug, ImagePath, PostDraft, User, UserId, UserSummary,
    Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, String> {
        let username = Username::new(self.username)
            .map_err(|err| format!("stored username for {} is invalid: {err}", self.id))?;
        Ok(User::new(UserId::from_uuid(self.id), username, self.is_staff))
    }
}

/// Insertable struct for creating accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub is_staff: bool,
}

/// Author columns needed to render posts and comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
}

impl AuthorRow {
    pub(crate) fn into_summary(self) -> Result<UserSummary, String> {
        let username = Username::new(self.username)
            .map_err(|err| format!("stored username for {} is invalid: {err}", self.id))?;
        Ok(UserSummary {
            id: UserId::from_uuid(self.id),
            username,
        })
    }
}

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    pub(crate) fn into_group(self) -> Result<Group, String> {
        let slug = GroupSlug::new(self.slug)
            .map_err(|err| format!("stored slug for group {} is invalid: {err}", self.id))?;
        Ok(Group {
            id: GroupId::new(self.id),
            title: self.title,
            slug,
            description: self.description,
        })
    }
}

/// Insert and update payload for groups.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = groups)]
pub(crate) struct GroupChanges<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a GroupDraft> for GroupChanges<'a> {
    fn from(draft: &'a GroupDraft) -> Self {
        Self {
            title: &draft.title,
            slug: draft.slug.as_str(),
            description: &draft.description,
        }
    }
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl PostRow {
    pub(crate) fn image_path(&self) -> Result<Option<ImagePath>, String> {
        self.image
            .as_deref()
            .map(ImagePath::new)
            .transpose()
            .map_err(|err| format!("stored image for post {} is invalid: {err}", self.id))
    }
}

/// Insertable struct for publishing posts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<i32>,
    pub image: Option<&'a str>,
}

/// Editable post columns. `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PostChanges<'a> {
    pub text: &'a str,
    pub group_id: Option<i32>,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a PostDraft> for PostChanges<'a> {
    fn from(draft: &'a PostDraft) -> Self {
        Self {
            text: &draft.text,
            group_id: draft.group.map(GroupId::get),
            image: draft.image.as_ref().map(ImagePath::as_str),
        }
    }
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i32,
    pub post_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// Insertable struct for comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i32,
    pub author_id: Uuid,
    pub text: &'a str,
    pub created: DateTime<Utc>,
}

/// Insertable follow edge.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct FollowRow {
    pub user_id: Uuid,
    pub author_id: Uuid,
}
