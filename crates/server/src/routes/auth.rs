//! Login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::set_current_user;
use crate::models::{CurrentUser, FieldError, Flash};
use crate::services::auth::{AuthError, authenticate};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
struct LoginTemplate {
    /// Message from a failed attempt, empty otherwise.
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /login` - the login form, with the flash message of a failed
/// attempt when there is one.
pub async fn login_page(session: Session) -> Result<impl IntoResponse, AppError> {
    let flash = Flash::take(&session).await?;
    Ok(LoginTemplate {
        message: flash
            .errors
            .into_iter()
            .next()
            .map(|e| e.message)
            .unwrap_or_default(),
    })
}

/// `POST /login` - verify the credentials and open a session.
///
/// A bad credential is answered the same way as validation failures
/// elsewhere: flash and redirect back to the form.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match authenticate(state.store(), &form.login, &form.password).await {
        Ok(account) => {
            set_current_user(&session, &CurrentUser::from_account(&account)).await?;
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            Flash::failure(vec![FieldError::new("login", "Identifiants incorrects.")])
                .set(&session)
                .await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => Err(AppError::Auth(e)),
    }
}

/// `GET /logout` - drop the whole session and go back to the home page.
pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}
