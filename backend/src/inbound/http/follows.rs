//! Following and unfollowing authors.
//!
//! ```text
//! POST /profile/{username}/follow/
//! POST /profile/{username}/unfollow/
//! ```
//!
//! Only `POST` changes follow edges; a cross-site `GET` cannot. The caller
//! lands back on the author's profile.

use actix_web::{HttpRequest, HttpResponse, post, web};

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::{found, or_login};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Follow an author. Following twice, or following yourself, changes nothing.
#[utoipa::path(
    post,
    path = "/profile/{username}/follow/",
    params(("username" = String, Path, description = "Author username")),
    responses(
        (status = 302, description = "Redirect to the profile, or to login"),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["follows"],
    operation_id = "profileFollow"
)]
#[post("/profile/{username}/follow/")]
pub async fn profile_follow(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let result = state
        .contributions
        .follow(session.viewer(), &username)
        .await
        .map(|target| found(&target));
    or_login(&req, result)
}

/// Stop following an author. Unfollowing someone you never followed is fine.
#[utoipa::path(
    post,
    path = "/profile/{username}/unfollow/",
    params(("username" = String, Path, description = "Author username")),
    responses(
        (status = 302, description = "Redirect to the profile, or to login"),
        (status = 404, description = "Unknown author", body = Error)
    ),
    tags = ["follows"],
    operation_id = "profileUnfollow"
)]
#[post("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let result = state
        .contributions
        .unfollow(session.viewer(), &username)
        .await
        .map(|target| found(&target));
    or_login(&req, result)
}
