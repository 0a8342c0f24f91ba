//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::accounts::AccountServiceError;
use crate::services::auth::AuthError;

/// Application-level error type for request handlers.
///
/// Validation failures never surface here: they are flashed to the session
/// and answered with a redirect by the handler itself. `AppError` covers
/// what is left, mostly store failures with no local remediation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Persistence layer failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication service failure (not a bad credential - those are
    /// handled as flash messages).
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Requested entity does not exist. Handlers usually branch on
    /// not-found themselves and redirect; this variant is the fallback.
    #[error("not found: {0}")]
    NotFound(String),

    /// Template rendering failed.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// Account workflow failure (store plus media cleanup).
    #[error("workflow error: {0}")]
    Workflow(#[from] AccountServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server-side failures are captured with Sentry before answering.
        // Not-found outcomes are redirected, never reported.
        if !matches!(self, Self::NotFound(_) | Self::Store(StoreError::NotFound)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "request error"
            );
        }

        match self {
            // Unknown ids and slugs go back to a safe default, never a
            // stack trace.
            Self::NotFound(_) | Self::Store(StoreError::NotFound) => {
                Redirect::to("/").into_response()
            }
            Self::Store(_) | Self::Auth(_) | Self::Session(_) | Self::Template(_) | Self::Workflow(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Une erreur est survenue. Merci de réessayer plus tard.",
            )
                .into_response(),
        }
    }
}
