//! Shop dashboard: each logged-in company manages its own page content,
//! logo and password.
//!
//! The target account is always the one in the session. Submitted `id`
//! fields are ignored here, so a shop can never write another company's
//! record.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::error::AppError;
use crate::middleware::RequireLogin;
use crate::models::{CurrentUser, Flash};
use crate::services::uploads::read_upload_form;
use crate::state::AppState;

use super::forms::{
    AccountView, PasswordForm, PasswordFormTemplate, ProfileForm, ProfileFormTemplate,
    handle_logo_upload, handle_password_post, handle_profile_post,
};

const CONTENT_URL: &str = "/dashboard/contenu-magasin";
const PASSWORD_URL: &str = "/dashboard/modification-mot-de-passe-magasin";

/// Landing page of the shop dashboard. Also rendered in place of admin
/// views when a shop user requests one.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/shop_home.html")]
pub struct ShopHomeTemplate {
    pub company_name: String,
}

impl ShopHomeTemplate {
    #[must_use]
    pub fn for_user(user: &CurrentUser) -> Self {
        Self {
            company_name: user.company_name.clone(),
        }
    }
}

/// `GET /dashboard/contenu-magasin` - the company's own content form.
pub async fn content_page(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
) -> Result<Response, AppError> {
    let Some(account) = state.store().find_by_id(user.id).await? else {
        // The account behind this session is gone; drop the session.
        session.flush().await?;
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(ProfileFormTemplate {
        title: "Contenu de ma page",
        action: CONTENT_URL,
        logo_action: "/dashboard/contenu-magasin/logo",
        account: AccountView::from(&account),
        flash: Flash::take(&session).await?,
    }
    .into_response())
}

/// `POST /dashboard/contenu-magasin`.
pub async fn update_content(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    handle_profile_post(&state, &session, user.id, &form, CONTENT_URL).await
}

/// `POST /dashboard/contenu-magasin/logo`.
pub async fn upload_logo(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    match read_upload_form(&mut multipart, "logo").await {
        Ok(form) => handle_logo_upload(&state, user.id, form.file.as_ref(), CONTENT_URL).await,
        Err(e) => {
            tracing::warn!(account_id = %user.id, error = %e, "logo upload rejected");
            Ok(Redirect::to(CONTENT_URL).into_response())
        }
    }
}

/// `GET /dashboard/modification-mot-de-passe-magasin`.
pub async fn password_page(
    RequireLogin(_): RequireLogin,
    session: Session,
) -> Result<PasswordFormTemplate, AppError> {
    Ok(PasswordFormTemplate {
        title: "Modification du mot de passe",
        action: PASSWORD_URL,
        flash: Flash::take(&session).await?,
    })
}

/// `POST /dashboard/modification-mot-de-passe-magasin`.
pub async fn change_password(
    State(state): State<AppState>,
    RequireLogin(user): RequireLogin,
    session: Session,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    handle_password_post(&state, &session, user.id, &form, PASSWORD_URL).await
}
