//! Shared application state.

use std::sync::Arc;

use crate::db::AccountStore;
use crate::services::uploads::MediaStore;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the inner data sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn AccountStore>,
    media: MediaStore,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, media: MediaStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store, media }),
        }
    }

    /// The account store.
    #[must_use]
    pub fn store(&self) -> &dyn AccountStore {
        self.inner.store.as_ref()
    }

    /// The media store for uploaded files.
    #[must_use]
    pub fn media(&self) -> &MediaStore {
        &self.inner.media
    }
}
