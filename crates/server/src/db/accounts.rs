//! `PostgreSQL` account store.
//!
//! Queries use the runtime-checked sqlx API so the crate builds without a
//! live database. The schema is created by the migration in
//! `crates/server/migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use quartier_core::{AccountId, Email};

use super::{AccountStore, ConflictField, StoreError};
use crate::models::{Account, Contact, NewAccount, Page};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for account queries.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i32,
    is_super_admin: bool,
    company_name: String,
    company_name_slug: String,
    mail: String,
    logo: String,
    login: String,
    password_hash: String,
    presentation: String,
    address: String,
    schedule: String,
    website: String,
    facebook: String,
    twitter: String,
    instagram: String,
    left_indicator: Option<i32>,
    right_indicator: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let mail = Email::parse(&row.mail).map_err(|e| {
            StoreError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AccountId::new(row.id),
            is_super_admin: row.is_super_admin,
            company_name: row.company_name,
            company_name_slug: row.company_name_slug,
            mail,
            logo: row.logo,
            login: row.login,
            password_hash: row.password_hash,
            page: Page {
                presentation: row.presentation,
                address: row.address,
                schedule: row.schedule,
                contact: Contact {
                    website: row.website,
                    facebook: row.facebook,
                    twitter: row.twitter,
                    instagram: row.instagram,
                },
            },
            left_indicator: row.left_indicator,
            right_indicator: row.right_indicator,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = r"
    id, is_super_admin, company_name, company_name_slug, mail, logo,
    login, password_hash, presentation, address, schedule,
    website, facebook, twitter, instagram,
    left_indicator, right_indicator, created_at, updated_at
";

// =============================================================================
// Store
// =============================================================================

/// Account store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new `PostgreSQL` account store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn select(where_clause: &str) -> String {
        format!("SELECT {SELECT_COLUMNS} FROM account {where_clause}")
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_public(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query_as::<_, AccountRow>(&Self::select(
            "WHERE is_super_admin = FALSE ORDER BY company_name ASC",
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&Self::select("WHERE company_name_slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&Self::select("WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&Self::select("WHERE login = $1"))
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r"
            INSERT INTO account
                (is_super_admin, company_name, company_name_slug, mail, login, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "
        ))
        .bind(account.is_super_admin)
        .bind(&account.company_name)
        .bind(&account.company_name_slug)
        .bind(&account.mail)
        .bind(&account.login)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let field = if db.constraint().is_some_and(|c| c.contains("slug")) {
                    ConflictField::Slug
                } else {
                    ConflictField::Login
                };
                StoreError::Conflict(field)
            }
            _ => StoreError::Database(e),
        })?;

        row.try_into()
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE account SET
                company_name = $2, company_name_slug = $3, mail = $4, logo = $5,
                login = $6, password_hash = $7,
                presentation = $8, address = $9, schedule = $10,
                website = $11, facebook = $12, twitter = $13, instagram = $14,
                left_indicator = $15, right_indicator = $16,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(account.id)
        .bind(&account.company_name)
        .bind(&account.company_name_slug)
        .bind(&account.mail)
        .bind(&account.logo)
        .bind(&account.login)
        .bind(&account.password_hash)
        .bind(&account.page.presentation)
        .bind(&account.page.address)
        .bind(&account.page.schedule)
        .bind(&account.page.contact.website)
        .bind(&account.page.contact.facebook)
        .bind(&account.page.contact.twitter)
        .bind(&account.page.contact.instagram)
        .bind(account.left_indicator)
        .bind(account.right_indicator)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
