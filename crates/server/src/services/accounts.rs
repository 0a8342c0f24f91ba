//! Account workflows that span the store and the media store.

use quartier_core::AccountId;

use crate::db::{AccountStore, StoreError};
use crate::models::Account;

use super::uploads::{MediaStore, UploadError};

/// Errors from account workflows.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Delete an account together with its logo files.
///
/// The sweep of the logo files runs strictly before the record delete: the
/// record holds the only reference to the logo's base name, so removing it
/// first would orphan the cleanup. A missing account is a no-op.
///
/// # Errors
///
/// Returns `AccountServiceError` if the file sweep or the record delete
/// fails.
pub async fn delete_account(
    store: &dyn AccountStore,
    media: &MediaStore,
    id: AccountId,
) -> Result<(), AccountServiceError> {
    let Some(account) = store.find_by_id(id).await? else {
        return Ok(());
    };

    if !account.logo.is_empty() {
        media.remove_logo_files(&account.logo).await?;
    }

    store.delete_by_id(id).await?;
    Ok(())
}

/// Profile fields editable through the content forms.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub presentation: String,
    pub address: String,
    pub schedule: String,
    pub website: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub left_indicator: Option<i32>,
    pub right_indicator: Option<i32>,
}

/// Apply a validated profile update to an account record.
pub fn apply_profile(account: &mut Account, update: ProfileUpdate) {
    account.page.presentation = update.presentation;
    account.page.address = update.address;
    account.page.schedule = update.schedule;
    account.page.contact.website = update.website;
    account.page.contact.facebook = update.facebook;
    account.page.contact.twitter = update.twitter;
    account.page.contact.instagram = update.instagram;
    account.left_indicator = update.left_indicator;
    account.right_indicator = update.right_indicator;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryAccountStore;
    use crate::models::NewAccount;
    use crate::services::uploads::UploadedFile;
    use quartier_core::Email;

    async fn seeded_store() -> (MemoryAccountStore, Account) {
        let store = MemoryAccountStore::new();
        let account = store
            .create(NewAccount {
                is_super_admin: false,
                company_name: "Acme".to_string(),
                company_name_slug: "acme".to_string(),
                mail: Email::parse("acme@example.com").unwrap(),
                login: "acme".to_string(),
                password_hash: "$argon2id$fake".to_string(),
            })
            .await
            .unwrap();
        (store, account)
    }

    #[tokio::test]
    async fn test_delete_sweeps_logo_files_before_record() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("site"), dir.path().join("logo"));
        let (store, mut account) = seeded_store().await;

        let logo = media
            .store_logo(
                "acme",
                &UploadedFile {
                    original_name: "logo.jpg".to_string(),
                    bytes: b"jpeg".to_vec(),
                },
            )
            .await
            .unwrap();
        // A stale re-upload under another extension.
        media
            .store_logo(
                "acme",
                &UploadedFile {
                    original_name: "logo.png".to_string(),
                    bytes: b"png".to_vec(),
                },
            )
            .await
            .unwrap();
        account.logo = logo;
        store.update(&account).await.unwrap();

        delete_account(&store, &media, account.id).await.unwrap();

        assert!(store.find_by_id(account.id).await.unwrap().is_none());
        assert!(!media.logo_dir().join("acme.jpg").exists());
        assert!(!media.logo_dir().join("acme.png").exists());
        assert!(!media.logo_dir().join("acme.jpeg").exists());
    }

    #[tokio::test]
    async fn test_delete_without_logo() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("site"), dir.path().join("logo"));
        let (store, account) = seeded_store().await;

        delete_account(&store, &media, account.id).await.unwrap();
        assert!(store.find_by_id(account.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_account_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("site"), dir.path().join("logo"));
        let store = MemoryAccountStore::new();

        delete_account(&store, &media, quartier_core::AccountId::new(99))
            .await
            .unwrap();
    }

    #[test]
    fn test_apply_profile() {
        let mut account = Account {
            id: quartier_core::AccountId::new(1),
            is_super_admin: false,
            company_name: "Acme".to_string(),
            company_name_slug: "acme".to_string(),
            mail: Email::parse("acme@example.com").unwrap(),
            logo: String::new(),
            login: "acme".to_string(),
            password_hash: String::new(),
            page: crate::models::Page::default(),
            left_indicator: None,
            right_indicator: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        apply_profile(
            &mut account,
            ProfileUpdate {
                presentation: "Quincaillerie de quartier".to_string(),
                website: "https://acme.example.com".to_string(),
                left_indicator: Some(40),
                right_indicator: Some(60),
                ..ProfileUpdate::default()
            },
        );

        assert_eq!(account.page.presentation, "Quincaillerie de quartier");
        assert_eq!(account.page.contact.website, "https://acme.example.com");
        assert_eq!(account.left_indicator, Some(40));
    }
}
