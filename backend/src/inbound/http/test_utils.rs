//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    DisabledFeedCache, FeedCache, MockAdminCommand, MockContributionCommand, MockFeedQuery,
    MockLoginService,
};
use crate::domain::{ApiResult, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Port doubles for handler tests. Unset expectations panic when called.
pub struct TestPorts {
    /// Read side.
    pub feeds: MockFeedQuery,
    /// Authoring and following.
    pub contributions: MockContributionCommand,
    /// Staff operations.
    pub admin: MockAdminCommand,
    /// Password login.
    pub login: MockLoginService,
    /// Home cache; disabled unless a test swaps it.
    pub home_cache: Arc<dyn FeedCache>,
}

impl Default for TestPorts {
    fn default() -> Self {
        Self {
            feeds: MockFeedQuery::new(),
            contributions: MockContributionCommand::new(),
            admin: MockAdminCommand::new(),
            login: MockLoginService::new(),
            home_cache: Arc::new(DisabledFeedCache),
        }
    }
}

impl TestPorts {
    /// Wrap the doubles as handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            feeds: Arc::new(self.feeds),
            contributions: Arc::new(self.contributions),
            admin: Arc::new(self.admin),
            login: Arc::new(self.login),
            home_cache: self.home_cache,
        })
    }
}

/// Path of [`sign_in_as`] in test apps.
pub const TEST_SIGN_IN_PATH: &str = "/test/sign-in/{user_id}";

/// Handler that signs the caller in as the user in the path.
pub async fn sign_in_as(
    session: SessionContext,
    user_id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = UserId::new(user_id.into_inner())
        .map_err(|err| crate::domain::Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::Ok().finish())
}

/// The `session` cookie set by `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// A user id used by handler tests that need a signed-in caller.
pub const FIXTURE_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Sign in as `user_id` through [`sign_in_as`] and return the cookie.
pub async fn sign_in<S, B>(app: &S, user_id: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::get()
        .uri(&format!("/test/sign-in/{user_id}"))
        .to_request();
    let res = test::call_service(app, req).await;
    session_cookie(&res)
}

/// `Location` header of a redirect.
pub fn location<B>(response: &ServiceResponse<B>) -> Option<&str> {
    response
        .headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
}
