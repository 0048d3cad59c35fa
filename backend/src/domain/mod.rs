//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the blog's entities (users, groups, posts, comments,
//! follow edges) and the services that implement the driving ports. Nothing
//! here knows about HTTP or SQL; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Entities: User, Group, Post, Comment and their forms.
//! - Services: FeedService, ContributionService, AdminService,
//!   PasswordLoginService, FollowGraph.
//! - Provisioning: ensure_account for the configured staff account.

pub mod accounts;
pub mod admin;
pub mod auth;
pub mod authorization;
pub mod comment;
pub mod contribution;
pub mod error;
pub mod feed;
pub mod follow_graph;
pub mod form;
pub mod group;
pub mod identity;
pub mod login;
pub mod ports;
pub mod post;
mod repository_errors;
pub mod routes;
mod slug;
pub mod trace_id;
pub mod user;

pub use self::accounts::ensure_account;
pub use self::admin::AdminService;
pub use self::auth::{LoginCredentials, LoginValidationError, hash_password, verify_password};
#[cfg(test)]
pub use self::authorization::MockEditPolicy;
pub use self::authorization::{AuthorOnly, EditPolicy};
pub use self::comment::{Comment, CommentForm, NewComment};
pub use self::contribution::ContributionService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feed::{FeedFilter, FeedPage, FeedService, GroupFeed, PostDetail, ProfileFeed};
pub use self::follow_graph::FollowGraph;
pub use self::form::{FieldErrors, InvalidForm};
pub use self::group::{
    GROUP_TITLE_MAX, Group, GroupDraft, GroupForm, GroupId, GroupSlug, GroupSlugError,
    GroupSummary,
};
pub use self::identity::Viewer;
pub use self::login::PasswordLoginService;
pub use self::post::{
    IMAGE_PREFIX, ImagePath, ImagePathError, NewPost, Post, PostDraft, PostForm, PostId,
};
pub use self::routes::RouteTarget;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    NewUser, StoredCredentials, USERNAME_MAX, User, UserId, UserSummary, UserValidationError,
    Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use blog::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
