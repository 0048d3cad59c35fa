//! Password login against stored Argon2 hashes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{LoginService, UserRepository};
use super::{Error, LoginCredentials, UserId, verify_password};

/// [`LoginService`] backed by the user repository.
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
}

impl PasswordLoginService {
    /// Authenticate against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let invalid = || Error::unauthorized("invalid credentials");
        let Some(stored) = self.users.find_credentials(credentials.username()).await? else {
            debug!("login for unknown username");
            return Err(invalid());
        };
        if verify_password(credentials.password(), &stored.password_hash)? {
            Ok(stored.user_id)
        } else {
            Err(invalid())
        }
    }
}
