//! Login and logout.
//!
//! ```text
//! GET  /auth/login/?next=/create/
//! POST /auth/login/?next=/create/ {"username":"leo","password":"war-and-peace"}
//! POST /auth/logout/
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, LoginCredentials, LoginValidationError, RouteTarget};
use crate::inbound::http::ApiResult;
use crate::inbound::http::redirect::{found, path_for};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /auth/login/`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account name.
    #[schema(example = "leo")]
    pub username: String,
    /// Plain-text password.
    #[schema(example = "war-and-peace")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Where to go after signing in.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NextQuery {
    /// Local path to return to.
    #[param(example = "/create/")]
    pub next: Option<String>,
}

/// Only local absolute paths are honoured; anything else goes home.
fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_owned()
        }
        _ => path_for(&RouteTarget::Home),
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Describe the login form: where the caller will be sent afterwards.
#[utoipa::path(
    get,
    path = "/auth/login/",
    params(NextQuery),
    responses((status = 200, description = "Login prompt", body = NextQuery)),
    tags = ["users"],
    operation_id = "loginForm",
    security([])
)]
#[get("/auth/login/")]
pub async fn login_form(query: web::Query<NextQuery>) -> web::Json<NextQuery> {
    web::Json(NextQuery {
        next: Some(safe_next(query.next.as_deref())),
    })
}

/// Authenticate and establish a session, then follow `next`.
#[utoipa::path(
    post,
    path = "/auth/login/",
    params(NextQuery),
    request_body = LoginRequest,
    responses(
        (status = 302, description = "Logged in", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NextQuery>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    info!(%user_id, "user logged in");
    Ok(HttpResponse::Found()
        .insert_header((
            actix_web::http::header::LOCATION,
            safe_next(query.next.as_deref()),
        ))
        .finish())
}

/// End the session and go home.
#[utoipa::path(
    post,
    path = "/auth/logout/",
    responses((status = 302, description = "Logged out; redirect home")),
    tags = ["users"],
    operation_id = "logout"
)]
#[post("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    found(&RouteTarget::Home)
}
