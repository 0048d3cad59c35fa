//! Staff-only moderation endpoints.
//!
//! ```text
//! GET    /admin/groups/?q=cat
//! POST   /admin/groups/            {"title":"Cats","slug":"cats","description":""}
//! PUT    /admin/groups/{group_id}/
//! DELETE /admin/groups/{group_id}/
//! GET    /admin/posts/?q=hello&date=2024-03-01&page=2
//! PATCH  /admin/posts/{post_id}/   {"group":3}
//! ```
//!
//! Unlike the authoring routes these are JSON-only: anonymous callers get
//! 401 and non-staff callers 403 rather than a login redirect.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use chrono::NaiveDate;
use pagination::PageNumber;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::PostSearch;
use crate::domain::{Error, Group, GroupForm, GroupId, Post, PostId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::FeedPageSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Title search for the group list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupSearchQuery {
    /// Case-insensitive title fragment.
    pub q: Option<String>,
}

/// Post search parameters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PostSearchQuery {
    /// Case-insensitive text fragment.
    pub q: Option<String>,
    /// Publication day, `YYYY-MM-DD`.
    #[param(example = "2024-03-01")]
    pub date: Option<String>,
    /// Requested one-based page.
    pub page: Option<String>,
}

impl PostSearchQuery {
    fn search(&self) -> Result<PostSearch, Error> {
        let published_on = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                Error::invalid_request("date must be YYYY-MM-DD").with_details(json!({
                    "field": "date",
                    "value": raw,
                    "code": "invalid_date",
                }))
            })?),
        };
        Ok(PostSearch {
            text: self.q.clone(),
            published_on,
        })
    }
}

/// Refile request for a post.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SetGroupRequest {
    /// New group id; `null` removes the post from its group.
    pub group: Option<i32>,
}

/// Groups ordered by id, optionally filtered by title.
#[utoipa::path(
    get,
    path = "/admin/groups/",
    params(GroupSearchQuery),
    responses(
        (status = 200, description = "Groups", body = [Group]),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not staff", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListGroups"
)]
#[get("/admin/groups/")]
pub async fn list_groups(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<GroupSearchQuery>,
) -> ApiResult<web::Json<Vec<Group>>> {
    let groups = state
        .admin
        .list_groups(session.viewer(), query.into_inner().q)
        .await?;
    Ok(web::Json(groups))
}

/// Create a group.
#[utoipa::path(
    post,
    path = "/admin/groups/",
    request_body = GroupForm,
    responses(
        (status = 201, description = "Created", body = Group),
        (status = 400, description = "Invalid form or taken slug", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Not staff", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCreateGroup"
)]
#[post("/admin/groups/")]
pub async fn create_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Json<GroupForm>,
) -> ApiResult<HttpResponse> {
    let group = state
        .admin
        .create_group(session.viewer(), form.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(group))
}

/// Replace a group's title, slug, and description.
#[utoipa::path(
    put,
    path = "/admin/groups/{group_id}/",
    params(("group_id" = i32, Path, description = "Group identifier")),
    request_body = GroupForm,
    responses(
        (status = 200, description = "Updated", body = Group),
        (status = 400, description = "Invalid form or taken slug", body = Error),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateGroup"
)]
#[put("/admin/groups/{group_id}/")]
pub async fn update_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    group_id: web::Path<i32>,
    form: web::Json<GroupForm>,
) -> ApiResult<web::Json<Group>> {
    let group = state
        .admin
        .update_group(
            session.viewer(),
            GroupId::new(group_id.into_inner()),
            form.into_inner(),
        )
        .await?;
    Ok(web::Json(group))
}

/// Delete a group. Its posts stay, without a group.
#[utoipa::path(
    delete,
    path = "/admin/groups/{group_id}/",
    params(("group_id" = i32, Path, description = "Group identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteGroup"
)]
#[delete("/admin/groups/{group_id}/")]
pub async fn delete_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    group_id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    state
        .admin
        .delete_group(session.viewer(), GroupId::new(group_id.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Search posts by text and publication day, newest first.
#[utoipa::path(
    get,
    path = "/admin/posts/",
    params(PostSearchQuery),
    responses(
        (status = 200, description = "Matching posts", body = FeedPageSchema),
        (status = 400, description = "Malformed date", body = Error),
        (status = 403, description = "Not staff", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListPosts"
)]
#[get("/admin/posts/")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PostSearchQuery>,
) -> ApiResult<HttpResponse> {
    let search = query.search()?;
    let page = state
        .admin
        .list_posts(
            session.viewer(),
            search,
            PageNumber::parse(query.page.as_deref()),
        )
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Move a post to another group, or out of its group.
#[utoipa::path(
    patch,
    path = "/admin/posts/{post_id}/",
    params(("post_id" = i32, Path, description = "Post identifier")),
    request_body = SetGroupRequest,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Unknown group", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetPostGroup"
)]
#[patch("/admin/posts/{post_id}/")]
pub async fn set_post_group(
    state: web::Data<HttpState>,
    session: SessionContext,
    post_id: web::Path<i32>,
    payload: web::Json<SetGroupRequest>,
) -> ApiResult<web::Json<Post>> {
    let post = state
        .admin
        .set_post_group(
            session.viewer(),
            PostId::new(post_id.into_inner()),
            payload.group.map(GroupId::new),
        )
        .await?;
    Ok(web::Json(post))
}
