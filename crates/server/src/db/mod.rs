//! Persistence gateway for account records.
//!
//! The rest of the server talks to [`AccountStore`], a thin CRUD façade.
//! Production uses [`PgAccountStore`] backed by `PostgreSQL`;
//! [`MemoryAccountStore`] serves tests and database-less local runs.
//!
//! Not-found is always an explicit outcome (`Ok(None)` /
//! [`StoreError::NotFound`]) so callers can branch on it; it never reaches
//! a response as an unhandled failure.
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are run explicitly via:
//! ```bash
//! cargo run -p quartier-cli -- migrate
//! ```

pub mod accounts;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use quartier_core::AccountId;

use crate::models::{Account, NewAccount};

pub use accounts::PgAccountStore;
pub use memory::MemoryAccountStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate login or slug).
    #[error("constraint violation on {0}")]
    Conflict(ConflictField),
}

/// Which unique constraint a conflicting write violated.
///
/// The account table carries two: one on `login`, one on
/// `company_name_slug`. Callers surface different messages for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Login,
    Slug,
}

impl std::fmt::Display for ConflictField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Slug => write!(f, "company name slug"),
        }
    }
}

/// CRUD façade over the account entity store.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// List accounts shown in the public directory, sorted ascending by
    /// company name. Super-admin accounts are excluded.
    async fn find_public(&self) -> Result<Vec<Account>, StoreError>;

    /// Look up an account by its company-name slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account by ID.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Look up an account by login. Used by the authentication service.
    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account and return the stored record with its assigned ID.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Persist the mutable fields of an existing account.
    ///
    /// Last write wins; there is no version check on concurrent edits.
    async fn update(&self, account: &Account) -> Result<(), StoreError>;

    /// Delete an account record by ID.
    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
