//! Account bootstrap commands.
//!
//! The back office has no self-registration: the super-admin account is
//! created here, once, and every shop account is then created through the
//! dashboard.
//!
//! # Environment Variables
//!
//! - `QUARTIER_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use quartier_core::{Email, slugify};
use quartier_server::db::{AccountStore, PgAccountStore, StoreError};
use quartier_server::models::NewAccount;
use quartier_server::services::auth::{AuthError, hash_password};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store error.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Invalid email address.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password outside the accepted 6-20 character range.
    #[error("Password must be between 6 and 20 characters")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Hashing error: {0}")]
    Hash(#[from] AuthError),

    /// An account with this login already exists.
    #[error("An account already exists with login: {0}")]
    LoginExists(String),
}

/// Create the super-admin account and return its ID.
///
/// # Errors
///
/// Returns `AccountError` on invalid input, an existing login, or a
/// database failure.
pub async fn create_super_admin(
    company_name: &str,
    login: &str,
    mail: &str,
    password: &str,
) -> Result<i32, AccountError> {
    dotenvy::dotenv().ok();

    let mail = Email::parse(mail).map_err(|e| AccountError::InvalidEmail(e.to_string()))?;

    let password_len = password.chars().count();
    if !(6..=20).contains(&password_len) {
        return Err(AccountError::WeakPassword);
    }

    let database_url = std::env::var("QUARTIER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AccountError::MissingEnvVar("QUARTIER_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    let store = PgAccountStore::new(pool);

    let account = store
        .create(NewAccount {
            is_super_admin: true,
            company_name: company_name.to_string(),
            company_name_slug: slugify(company_name),
            mail,
            login: login.to_string(),
            password_hash: hash_password(password)?,
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => AccountError::LoginExists(login.to_string()),
            other => AccountError::Store(other),
        })?;

    tracing::info!("Super-admin account created with id {}", account.id);
    Ok(account.id.as_i32())
}
