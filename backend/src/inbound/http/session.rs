//! Cookie session access for handlers.
//!
//! Handlers never touch the raw session; they ask for the [`Viewer`] and the
//! domain decides what anonymous callers may do.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, UserId, Viewer};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Session wrapper exposing the signed-in user.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Remember `user_id` as signed in, rotating the session identifier.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the session cannot be written.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the signed-in user.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The caller as seen by the domain. A tampered or unreadable cookie
    /// counts as anonymous.
    pub fn viewer(&self) -> Viewer {
        match self.0.get::<String>(USER_ID_KEY) {
            Ok(Some(raw)) => match UserId::new(raw) {
                Ok(id) => Viewer::Authenticated(id),
                Err(error) => {
                    warn!(%error, "invalid user id in session cookie");
                    Viewer::Anonymous
                }
            },
            Ok(None) => Viewer::Anonymous,
            Err(error) => {
                warn!(%error, "unreadable session cookie");
                Viewer::Anonymous
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
