//! Startup account provisioning.
//!
//! Accounts are created out-of-band; the server only makes sure a configured
//! staff account exists so an empty deployment can be administered.

use tracing::info;

use super::ports::UserRepository;
use super::{Error, NewUser, User, UserId, Username, hash_password};

/// Return the account named `username`, creating it when absent.
///
/// An existing account is returned untouched; its password and staff flag are
/// not reset.
///
/// # Errors
///
/// Returns `invalid_request` for a malformed username, or the repository
/// failure mapped to [`Error`].
///
/// # Examples
/// ```
/// use blog::domain::ensure_account;
/// use blog::outbound::memory::InMemoryStore;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), blog::domain::Error> {
/// let store = InMemoryStore::new();
/// let admin = ensure_account(&store, "admin", "s3cret", true).await?;
/// assert!(admin.is_staff());
/// # Ok(())
/// # }
/// ```
pub async fn ensure_account(
    users: &dyn UserRepository,
    username: &str,
    password: &str,
    is_staff: bool,
) -> Result<User, Error> {
    let username = Username::new(username.trim())
        .map_err(|err| Error::invalid_request(format!("invalid account username: {err}")))?;
    if let Some(existing) = users.find_by_username(&username).await? {
        return Ok(existing);
    }

    let new_user = NewUser {
        id: UserId::random(),
        username,
        password_hash: hash_password(password)?,
        is_staff,
    };
    let created = users.insert(&new_user).await?;
    info!(username = %created.username(), is_staff, "provisioned account");
    Ok(created)
}
