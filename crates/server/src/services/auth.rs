//! Authentication service.
//!
//! Password authentication against the account store. Hashing is argon2;
//! no plaintext password is ever persisted or logged.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::db::{AccountStore, StoreError};
use crate::models::Account;

/// Errors produced by the authentication service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Unknown login or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing or verification failed structurally.
    #[error("password hash error: {0}")]
    Hash(argon2::password_hash::Error),

    /// Store failure while looking up the account.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(e: argon2::password_hash::Error) -> Self {
        match e {
            argon2::password_hash::Error::Password => Self::InvalidCredentials,
            other => Self::Hash(other),
        }
    }
}

/// Authenticate a login/password pair against the store.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` when the login is unknown or the
/// password does not match its stored hash.
pub async fn authenticate(
    store: &dyn AccountStore,
    login: &str,
    password: &str,
) -> Result<Account, AuthError> {
    let account = store
        .find_by_login(login)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(password, &account.password_hash)?;

    Ok(account)
}

/// Hash a plaintext password with argon2 and a fresh random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored argon2 hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on mismatch, `AuthError::Hash`
/// when the stored hash itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed)?;
    Ok(())
}
