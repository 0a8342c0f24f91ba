//! Account domain types.
//!
//! One `Account` exists per company, and one more for the
//! super-administrator. The super-admin record reuses the same shape but is
//! excluded from public listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quartier_core::{AccountId, Email};

/// Contact links shown on a company's public page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub website: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
}

/// Editable public-page content of a company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub presentation: String,
    pub address: String,
    pub schedule: String,
    pub contact: Contact,
}

/// A company's administrative record (domain type).
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID, assigned at creation, immutable.
    pub id: AccountId,
    /// Role flag, set once at creation. Never changed by the profile
    /// workflow.
    pub is_super_admin: bool,
    /// Display name of the company.
    pub company_name: String,
    /// URL-safe identifier, recomputed whenever `company_name` changes.
    pub company_name_slug: String,
    /// Contact email address.
    pub mail: Email,
    /// Stored logo filename (`{slug}.{ext}`), or empty when none was
    /// uploaded yet.
    pub logo: String,
    /// Login used for authentication.
    pub login: String,
    /// Argon2 hash of the password. Plaintext is never persisted.
    pub password_hash: String,
    /// Public page content.
    pub page: Page,
    /// Horizontal map-pin position, percentage in [0, 100].
    pub left_indicator: Option<i32>,
    /// Vertical map-pin position, percentage in [0, 100].
    pub right_indicator: Option<i32>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to create an `Account`. The store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub is_super_admin: bool,
    pub company_name: String,
    pub company_name_slug: String,
    pub mail: Email,
    pub login: String,
    pub password_hash: String,
}

/// Session identity of a logged-in user.
///
/// Stored in the tower-sessions session at login, removed at logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: AccountId,
    pub login: String,
    pub company_name: String,
    pub is_super_admin: bool,
}

impl CurrentUser {
    /// Build the session identity from an account record.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id,
            login: account.login.clone(),
            company_name: account.company_name.clone(),
            is_super_admin: account.is_super_admin,
        }
    }
}

/// Session keys used by the server.
pub mod session_keys {
    /// Identity of the logged-in user.
    pub const CURRENT_USER: &str = "current_user";
    /// One-shot flash state (success flag, validation errors, last
    /// submission echo).
    pub const FLASH: &str = "flash";
}
