//! Turning workflow outcomes into `302 Found` responses.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;
use url::form_urlencoded;

use crate::domain::ports::Outcome;
use crate::domain::{ApiResult, ErrorCode, RouteTarget};

/// Path of the login endpoint that anonymous callers are sent to.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Concrete path for a named route.
///
/// # Examples
/// ```
/// use blog::domain::{PostId, RouteTarget};
/// use blog::inbound::http::redirect::path_for;
///
/// assert_eq!(path_for(&RouteTarget::post_detail(PostId::new(7))), "/posts/7/");
/// ```
#[must_use]
pub fn path_for(target: &RouteTarget) -> String {
    match target {
        RouteTarget::Home => "/".to_owned(),
        RouteTarget::Profile { username } => format!("/profile/{username}/"),
        RouteTarget::PostDetail { post_id } => format!("/posts/{post_id}/"),
        RouteTarget::FollowIndex => "/follow/".to_owned(),
    }
}

/// `302 Found` pointing at `target`.
#[must_use]
pub fn found(target: &RouteTarget) -> HttpResponse {
    found_at(&path_for(target))
}

fn found_at(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Redirect on success; a rejected form becomes a 400 carrying the echo.
///
/// # Errors
///
/// Returns [`ErrorCode::InvalidRequest`] for [`Outcome::Invalid`].
pub fn outcome<F: Serialize>(outcome: Outcome<F>) -> ApiResult<HttpResponse> {
    match outcome {
        Outcome::Redirect(target) => Ok(found(&target)),
        Outcome::Invalid(invalid) => Err(invalid.into_error()),
    }
}

/// Login URL that returns to `next` after signing in.
#[must_use]
pub fn login_url(next: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Send anonymous callers of a login-required route to the login page.
/// Every other outcome passes through unchanged.
///
/// # Errors
///
/// Returns `result`'s error unless it is [`ErrorCode::Unauthorized`].
pub fn or_login(req: &HttpRequest, result: ApiResult<HttpResponse>) -> ApiResult<HttpResponse> {
    match result {
        Err(error) if error.code() == ErrorCode::Unauthorized => {
            let next = req
                .uri()
                .path_and_query()
                .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
            Ok(found_at(&login_url(&next)))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommentForm, Error, FieldErrors, InvalidForm, PostId, Username};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case(RouteTarget::Home, "/")]
    #[case(RouteTarget::FollowIndex, "/follow/")]
    #[case(RouteTarget::post_detail(PostId::new(12)), "/posts/12/")]
    #[case(
        RouteTarget::profile(&Username::new("leo.t").expect("valid username")),
        "/profile/leo.t/"
    )]
    fn named_routes_resolve_to_paths(#[case] target: RouteTarget, #[case] path: &str) {
        assert_eq!(path_for(&target), path);
        let response = found(&target);
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(path.as_bytes())
        );
    }

    #[rstest]
    fn login_url_encodes_the_return_path() {
        assert_eq!(
            login_url("/posts/3/comment/?a=b"),
            "/auth/login/?next=%2Fposts%2F3%2Fcomment%2F%3Fa%3Db"
        );
    }

    #[rstest]
    fn unauthorized_becomes_a_login_redirect() {
        let req = TestRequest::post().uri("/create/").to_http_request();
        let response = or_login(&req, Err(Error::unauthorized("login required")))
            .expect("redirect instead of error");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some("/auth/login/?next=%2Fcreate%2F".as_bytes())
        );
    }

    #[rstest]
    fn invalid_outcomes_echo_the_form() {
        let mut errors = FieldErrors::default();
        errors.add("text", "This field is required.");
        let err = outcome(Outcome::Invalid(InvalidForm {
            form: CommentForm::default(),
            errors,
        }))
        .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["form"]["text"], "");
        assert_eq!(details["errors"]["text"][0], "This field is required.");
    }

    #[rstest]
    fn other_errors_pass_through() {
        let req = TestRequest::get().uri("/posts/9/").to_http_request();
        let err = or_login(&req, Err(Error::not_found("no such post"))).expect_err("kept");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
