//! The caller on whose behalf an operation runs.

use super::{Error, UserId};

/// Who is making the request.
///
/// Inbound adapters build this from the session and pass it explicitly, so
/// services never consult ambient request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    /// No authenticated session.
    #[default]
    Anonymous,
    /// A logged-in user.
    Authenticated(UserId),
}

impl Viewer {
    /// The authenticated user id, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }

    /// The authenticated user id, or an `unauthorized` error.
    ///
    /// # Errors
    ///
    /// Returns [`super::ErrorCode::Unauthorized`] for anonymous viewers.
    pub fn require(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl From<Option<UserId>> for Viewer {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}
