//! Authoring: new posts, edits, and comments.
//!
//! ```text
//! GET  /create/
//! POST /create/                {"text":"...","group":1,"image":"cat.png"}
//! GET  /posts/{post_id}/edit/
//! POST /posts/{post_id}/edit/  {"text":"..."}
//! POST /posts/{post_id}/comment/ {"text":"..."}
//! ```
//!
//! Anonymous callers are redirected to the login page before the body is
//! read; successful writes answer `302 Found`; rejected forms answer 400 with
//! the input echoed.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::de::DeserializeOwned;

use crate::domain::ports::{FormPage, PostFormContext};
use crate::domain::{CommentForm, Error, PostForm, PostId, Viewer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::{found, or_login, outcome};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Decode a JSON form body for a signed-in caller. Anonymous callers get
/// `Unauthorized` before the body is read.
fn signed_in_form<F: DeserializeOwned>(viewer: Viewer, body: &[u8]) -> ApiResult<F> {
    viewer.require()?;
    serde_json::from_slice(body).map_err(|err| Error::invalid_request(format!("invalid form: {err}")))
}

/// Empty authoring form plus the groups a post may be filed under.
#[utoipa::path(
    get,
    path = "/create/",
    responses(
        (status = 200, description = "Authoring form", body = PostFormContext),
        (status = 302, description = "Anonymous caller sent to login")
    ),
    tags = ["posts"],
    operation_id = "postCreateForm"
)]
#[get("/create/")]
pub async fn create_form(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let result = state
        .contributions
        .new_post_form(session.viewer())
        .await
        .map(|context| HttpResponse::Ok().json(context));
    or_login(&req, result)
}

/// Publish a post; redirects to the author's profile.
#[utoipa::path(
    post,
    path = "/create/",
    request_body = PostForm,
    responses(
        (status = 302, description = "Created; redirect to profile or login"),
        (status = 400, description = "Invalid form, echoed in details", body = Error)
    ),
    tags = ["posts"],
    operation_id = "postCreate"
)]
#[post("/create/")]
pub async fn create_post(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let result = async {
        let form: PostForm = signed_in_form(viewer, &body)?;
        state.contributions.create_post(viewer, form).await.and_then(outcome)
    }
    .await;
    or_login(&req, result)
}

/// The edit form prefilled from the post. Non-authors are redirected to the
/// post page.
#[utoipa::path(
    get,
    path = "/posts/{post_id}/edit/",
    params(("post_id" = i32, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Edit form", body = PostFormContext),
        (status = 302, description = "Not the author, or anonymous"),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "postEditForm"
)]
#[get("/posts/{post_id}/edit/")]
pub async fn edit_form(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    post_id: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let result = state
        .contributions
        .edit_post_form(session.viewer(), PostId::new(post_id.into_inner()))
        .await
        .map(|page| match page {
            FormPage::Show(context) => HttpResponse::Ok().json(context),
            FormPage::Redirect(target) => found(&target),
        });
    or_login(&req, result)
}

/// Update a post in place. Non-authors are redirected without a write.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/edit/",
    params(("post_id" = i32, Path, description = "Post identifier")),
    request_body = PostForm,
    responses(
        (status = 302, description = "Redirect to the post page"),
        (status = 400, description = "Invalid form, echoed in details", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "postEdit"
)]
#[post("/posts/{post_id}/edit/")]
pub async fn edit_post(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    post_id: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let result = async {
        let form: PostForm = signed_in_form(viewer, &body)?;
        state
            .contributions
            .edit_post(viewer, PostId::new(post_id.into_inner()), form)
            .await
            .and_then(outcome)
    }
    .await;
    or_login(&req, result)
}

/// Comment on a post.
#[utoipa::path(
    post,
    path = "/posts/{post_id}/comment/",
    params(("post_id" = i32, Path, description = "Post identifier")),
    request_body = CommentForm,
    responses(
        (status = 302, description = "Redirect to the post page or login"),
        (status = 400, description = "Blank comment, echoed in details", body = Error),
        (status = 404, description = "Unknown post", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment"
)]
#[post("/posts/{post_id}/comment/")]
pub async fn add_comment(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    post_id: web::Path<i32>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer();
    let result = async {
        let form: CommentForm = signed_in_form(viewer, &body)?;
        state
            .contributions
            .add_comment(viewer, PostId::new(post_id.into_inner()), form)
            .await
            .and_then(outcome)
    }
    .await;
    or_login(&req, result)
}
