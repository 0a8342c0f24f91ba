//! In-memory account store.
//!
//! Backs the test suite. Behavior mirrors
//! [`PgAccountStore`](super::PgAccountStore): same not-found and conflict
//! outcomes, same public-listing ordering contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use quartier_core::AccountId;

use super::{AccountStore, ConflictField, StoreError};
use crate::models::{Account, NewAccount, Page};

/// Account store held in process memory.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<i32, Account>>,
    next_id: AtomicI32,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_public(&self) -> Result<Vec<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        let mut public: Vec<Account> = accounts
            .values()
            .filter(|a| !a.is_super_admin)
            .cloned()
            .collect();
        public.sort_by(|a, b| a.company_name.cmp(&b.company_name));
        Ok(public)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|a| a.company_name_slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id.as_i32()).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.login == login).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.login == account.login) {
            return Err(StoreError::Conflict(ConflictField::Login));
        }
        if accounts
            .values()
            .any(|a| a.company_name_slug == account.company_name_slug)
        {
            return Err(StoreError::Conflict(ConflictField::Slug));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = Account {
            id: AccountId::new(id),
            is_super_admin: account.is_super_admin,
            company_name: account.company_name,
            company_name_slug: account.company_name_slug,
            mail: account.mail,
            logo: String::new(),
            login: account.login,
            password_hash: account.password_hash,
            page: Page::default(),
            left_indicator: None,
            right_indicator: None,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let entry = accounts
            .get_mut(&account.id.as_i32())
            .ok_or(StoreError::NotFound)?;
        *entry = Account {
            updated_at: Utc::now(),
            ..account.clone()
        };
        Ok(())
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        accounts
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
