//! Authorization guards as axum extractors.
//!
//! The guard is a small state machine over (session identity present?,
//! role):
//!
//! - unauthenticated on a login-gated route - redirect to `/login`
//! - authenticated non-super-admin on a super-admin route - soft-deny:
//!   render the ordinary shop dashboard in place of the requested admin
//!   view (HTTP 200, never a 403)
//! - otherwise - continue, handing the [`CurrentUser`] to the handler
//!
//! The super-admin check composes on top of the login check: it can only
//! soft-deny someone who already passed it.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::routes::shop::ShopHomeTemplate;

/// Extractor for routes that require any logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireLogin(user): RequireLogin) -> impl IntoResponse {
///     format!("Bonjour {}", user.company_name)
/// }
/// ```
pub struct RequireLogin(pub CurrentUser);

/// Rejection for [`RequireLogin`]: always a redirect to the login page.
pub struct LoginRedirect;

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireLogin
where
    S: Send + Sync,
{
    type Rejection = LoginRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts).await.map(Self).ok_or(LoginRedirect)
    }
}

/// Extractor for routes reserved to the super-administrator.
pub struct RequireSuperAdmin(pub CurrentUser);

/// Rejection for [`RequireSuperAdmin`].
pub enum SuperAdminRejection {
    /// Not logged in at all - same redirect as [`RequireLogin`].
    RedirectToLogin,
    /// Logged in but not the super-admin - render the shop dashboard
    /// instead of the requested admin view.
    ShopDashboard(CurrentUser),
}

impl IntoResponse for SuperAdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::ShopDashboard(user) => ShopHomeTemplate::for_user(&user).into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = SuperAdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts)
            .await
            .ok_or(SuperAdminRejection::RedirectToLogin)?;

        if !user.is_super_admin {
            return Err(SuperAdminRejection::ShopDashboard(user));
        }

        Ok(Self(user))
    }
}

/// Extractor that optionally yields the current user.
///
/// Public pages use it to switch the navbar between "Connexion" and
/// "Dashboard" without gating the request.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Read the current user from the session placed in request extensions by
/// the session layer.
async fn current_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
