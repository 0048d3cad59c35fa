//! Feed pages.
//!
//! ```text
//! GET /?page=2
//! GET /group/{slug}/
//! GET /profile/{username}/
//! GET /posts/{post_id}/
//! GET /follow/
//! ```

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};
use pagination::PageNumber;
use serde::Deserialize;
use tracing::{debug, warn};
use utoipa::IntoParams;

use crate::domain::{Error, GroupFeed, PostDetail, PostId, ProfileFeed};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::or_login;
use crate::inbound::http::schemas::FeedPageSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `?page=` as sent by the client. Anything that is not an integer means the
/// first page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Requested one-based page.
    #[param(example = "2")]
    pub page: Option<String>,
}

impl PageQuery {
    fn number(&self) -> PageNumber {
        PageNumber::parse(self.page.as_deref())
    }

    fn cache_key(&self) -> String {
        format!("home:{}", self.page.as_deref().map_or("", str::trim))
    }
}

fn json_body(body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}

/// The front page: every post, newest first.
///
/// Responses are cached per page for a short TTL, so new posts can take that
/// long to appear.
#[utoipa::path(
    get,
    path = "/",
    params(PageQuery),
    responses(
        (status = 200, description = "Front page", body = FeedPageSchema),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "home",
    security([])
)]
#[get("/")]
pub async fn home(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let key = query.cache_key();
    match state.home_cache.get(&key).await {
        Ok(Some(body)) => {
            debug!(%key, "home feed served from cache");
            return Ok(json_body(body));
        }
        Ok(None) => {}
        Err(error) => warn!(%error, "home feed cache read failed"),
    }

    let page = state.feeds.home(query.number()).await?;
    let body = serde_json::to_vec(&page)
        .map_err(|err| Error::internal(format!("failed to encode home feed: {err}")))?;
    if let Err(error) = state.home_cache.put(&key, body.clone()).await {
        warn!(%error, "home feed cache write failed");
    }
    Ok(json_body(body))
}

/// Posts filed under a group.
#[utoipa::path(
    get,
    path = "/group/{slug}/",
    params(("slug" = String, Path, description = "Group slug"), PageQuery),
    responses(
        (status = 200, description = "Group page", body = GroupFeed),
        (status = 404, description = "Unknown group", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "groupList",
    security([])
)]
#[get("/group/{slug}/")]
pub async fn group_list(
    state: web::Data<HttpState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<GroupFeed>> {
    let feed = state.feeds.group(&slug, query.number()).await?;
    Ok(web::Json(feed))
}

/// An author's posts and whether the caller follows them.
#[utoipa::path(
    get,
    path = "/profile/{username}/",
    params(("username" = String, Path, description = "Author username"), PageQuery),
    responses(
        (status = 200, description = "Profile page", body = ProfileFeed),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "profile"
)]
#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<ProfileFeed>> {
    let feed = state
        .feeds
        .profile(session.viewer(), &username, query.number())
        .await?;
    Ok(web::Json(feed))
}

/// A single post with its comments.
#[utoipa::path(
    get,
    path = "/posts/{post_id}/",
    params(("post_id" = i32, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post page", body = PostDetail),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["feeds"],
    operation_id = "postDetail",
    security([])
)]
#[get("/posts/{post_id}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    post_id: web::Path<i32>,
) -> ApiResult<web::Json<PostDetail>> {
    let detail = state
        .feeds
        .post_detail(PostId::new(post_id.into_inner()))
        .await?;
    Ok(web::Json(detail))
}

/// Posts by the authors the caller follows.
#[utoipa::path(
    get,
    path = "/follow/",
    params(PageQuery),
    responses(
        (status = 200, description = "Followed authors' posts", body = FeedPageSchema),
        (status = 302, description = "Anonymous caller sent to login")
    ),
    tags = ["feeds"],
    operation_id = "followIndex"
)]
#[get("/follow/")]
pub async fn follow_index(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let result = state
        .feeds
        .followed(session.viewer(), query.number())
        .await
        .map(|page| HttpResponse::Ok().json(page));
    or_login(&req, result)
}
