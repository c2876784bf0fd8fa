//! Sign-in session handling.
//!
//! Authentication here is deliberately a stand-in: any email plus a
//! password of at least six characters is accepted, exactly like the
//! demo login this replaces. The rest of the system only ever consumes
//! the resulting user id for storage namespacing.

use uuid::Uuid;

use crate::io::storage::{Storage, StorageError};
use crate::model::User;

/// Storage key for the signed-in user. Never prefixed: the session is
/// what the prefix is derived from.
pub const USER_KEY: &str = "noteflow_user";

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;

/// Why a login attempt was rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
}

/// Read the signed-in user, if any.
pub fn current_user(storage: &dyn Storage) -> Result<Option<User>, StorageError> {
    let Some(raw) = storage.get(USER_KEY)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw).map(Some).map_err(|e| StorageError::Malformed {
        key: USER_KEY.to_string(),
        source: e,
    })
}

/// Validate credentials and persist a fresh user.
///
/// The user id is newly minted on every login; the display name is the
/// email's local part.
pub fn login(
    storage: &mut dyn Storage,
    email: &str,
    password: &str,
) -> Result<Result<User, LoginError>, StorageError> {
    if email.is_empty() || !email.contains('@') {
        return Ok(Err(LoginError::InvalidEmail));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Ok(Err(LoginError::PasswordTooShort));
    }

    let name = email.split('@').next().unwrap_or(email).to_string();
    let user = User {
        id: format!("user-{}", Uuid::new_v4().simple()),
        email: email.to_string(),
        name,
    };

    let raw = serde_json::to_string(&user).map_err(|e| StorageError::Encode {
        key: USER_KEY.to_string(),
        source: e,
    })?;
    storage.set(USER_KEY, &raw)?;
    Ok(Ok(user))
}

/// Remove the persisted session. Signing out while signed out is fine.
pub fn logout(storage: &mut dyn Storage) -> Result<(), StorageError> {
    storage.remove(USER_KEY)
}
