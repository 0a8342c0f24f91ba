//! One-shot flash state carried between a write handler and the following
//! page render.
//!
//! A write endpoint stores its outcome here and redirects; the next GET of
//! the same logical page takes the flash out of the session (get-and-clear)
//! and renders it. The state lives server-side, keyed by the session
//! identity, so nothing leaks into the URL.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::session_keys;

/// A single violated validation rule, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending form field.
    pub field: String,
    /// User-facing, localized message supplied by the endpoint.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flash state set by write endpoints and consumed exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flash {
    /// Whether the previous submission was persisted.
    pub success: bool,
    /// Validation errors of the previous submission, empty when none.
    pub errors: Vec<FieldError>,
    /// Echo of the previous failed submission, used to refill the form.
    pub last_post_item: HashMap<String, String>,
}

impl Flash {
    /// Flash for a successful write.
    #[must_use]
    pub fn success() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Flash for a failed validation, without a submission echo.
    #[must_use]
    pub fn failure(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            errors,
            last_post_item: HashMap::new(),
        }
    }

    /// Flash for a failed validation, echoing the submitted values.
    #[must_use]
    pub fn failure_with_echo(errors: Vec<FieldError>, last_post_item: HashMap<String, String>) -> Self {
        Self {
            success: false,
            errors,
            last_post_item,
        }
    }

    /// Store this flash in the session for the next page load.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::FLASH, self).await
    }

    /// Take the flash out of the session, clearing it.
    ///
    /// Returns the default (no success, no errors) when no write happened
    /// since the last read.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read.
    pub async fn take(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .remove::<Self>(session_keys::FLASH)
            .await?
            .unwrap_or_default())
    }
}
