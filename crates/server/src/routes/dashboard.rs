//! Super-admin dashboard: the company listing, per-company content and
//! account edits, account creation and deletion, site assets, and the
//! super-admin password.
//!
//! Every handler takes the [`RequireSuperAdmin`] guard. A logged-in shop
//! user who requests one of these pages gets the shop dashboard rendered in
//! place (the guard's soft-deny), never an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::Form;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;

use quartier_core::{AccountId, Email, slugify};

use crate::db::{ConflictField, StoreError};
use crate::error::AppError;
use crate::middleware::RequireSuperAdmin;
use crate::models::{FieldError, Flash, NewAccount};
use crate::services::accounts::delete_account;
use crate::services::auth::hash_password;
use crate::services::uploads::read_upload_form;
use crate::state::AppState;
use crate::validate::{Rule, RuleSet};

use super::forms::{
    AccountView, PasswordForm, PasswordFormTemplate, ProfileForm, ProfileFormTemplate,
    handle_logo_upload, handle_password_post, handle_profile_post,
};

const CREATE_ACCOUNT_URL: &str = "/dashboard/creation-compte-magasin";
const SITE_ASSETS_URL: &str = "/dashboard/modification-elements-site";
const ADMIN_PASSWORD_URL: &str = "/dashboard/modification-mot-de-passe-superadmin";

// ============================================================================
// Templates
// ============================================================================

struct CompanyRow {
    id: i32,
    name: String,
    slug: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/home.html")]
struct DashboardTemplate {
    companies: Vec<CompanyRow>,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/account_form.html")]
struct AccountFormTemplate {
    account: AccountView,
    flash: Flash,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/create_account.html")]
pub struct CreateAccountTemplate {
    flash: Flash,
    last_company_name: String,
    last_login: String,
    last_mail: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard/site_assets.html")]
pub struct SiteAssetsTemplate {
    flash: Flash,
}

// ============================================================================
// Listing
// ============================================================================

/// `GET /dashboard` - every company, with links to its edit pages.
pub async fn home(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state.store().find_public().await?;
    Ok(DashboardTemplate {
        companies: accounts
            .iter()
            .map(|account| CompanyRow {
                id: account.id.as_i32(),
                name: account.company_name.clone(),
                slug: account.company_name_slug.clone(),
            })
            .collect(),
    })
}

// ============================================================================
// Per-company content
// ============================================================================

/// `GET /dashboard/update/{id}` - a company's content form.
pub async fn update_page(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let Some(account) = state.store().find_by_id(AccountId::new(id)).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(ProfileFormTemplate {
        title: "Contenu de la page",
        action: "/dashboard/update",
        logo_action: "/dashboard/update/logo",
        account: AccountView::from(&account),
        flash: Flash::take(&session).await?,
    }
    .into_response())
}

/// `POST /dashboard/update` - persist a company's content. The target comes
/// from the form's hidden `id`.
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let Ok(id) = form.id.parse::<i32>() else {
        return Ok(Redirect::to("/dashboard").into_response());
    };
    let back = format!("/dashboard/update/{id}");
    handle_profile_post(&state, &session, AccountId::new(id), &form, &back).await
}

/// `POST /dashboard/update/logo` - store a company's logo.
pub async fn upload_logo(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let form = match read_upload_form(&mut multipart, "logo").await {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!(error = %e, "logo upload rejected");
            return Ok(Redirect::to("/dashboard").into_response());
        }
    };

    let id = form.fields.get("id").and_then(|v| v.parse::<i32>().ok());
    let Some(id) = id else {
        return Ok(Redirect::to("/dashboard").into_response());
    };
    let back = format!("/dashboard/update/{id}");
    handle_logo_upload(&state, AccountId::new(id), form.file.as_ref(), &back).await
}

// ============================================================================
// Per-company account
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ShopAccountForm {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "companyName")]
    pub company_name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
    #[serde(default, rename = "newPasswordVerification")]
    pub new_password_verification: String,
}

fn shop_account_rules() -> RuleSet {
    RuleSet::new()
        .rule(
            "companyName",
            "Le nom du magasin ne peut pas être vide.",
            Rule::Required,
        )
        .rule("login", "Le login ne peut pas être vide.", Rule::Required)
        .rule("mail", "L'adresse mail ne peut pas être vide.", Rule::Required)
        .rule_if_present("mail", "L'adresse mail est invalide.", Rule::Email)
        .rule_if_present(
            "newPassword",
            "Le mot de passe doit faire entre 6 et 20 caractères.",
            Rule::Len(6, 20),
        )
        .rule(
            "newPassword",
            "Les deux mots de passe ne correspondent pas.",
            Rule::EqualsField("newPasswordVerification"),
        )
}

/// `GET /dashboard/shop-update/{id}` - a company's account form.
pub async fn shop_update_page(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let Some(account) = state.store().find_by_id(AccountId::new(id)).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(AccountFormTemplate {
        account: AccountView::from(&account),
        flash: Flash::take(&session).await?,
    }
    .into_response())
}

/// `POST /dashboard/shop-update` - persist a company's account fields.
///
/// The slug is recomputed from the submitted company name, so the public
/// URL follows a rename. The password is re-hashed only when a new one was
/// actually submitted.
pub async fn shop_update(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    Form(form): Form<ShopAccountForm>,
) -> Result<Response, AppError> {
    let Ok(id) = form.id.parse::<i32>() else {
        return Ok(Redirect::to("/dashboard").into_response());
    };
    let back = format!("/dashboard/shop-update/{id}");

    let submission = [
        ("companyName", form.company_name.as_str()),
        ("login", form.login.as_str()),
        ("mail", form.mail.as_str()),
        ("newPassword", form.new_password.as_str()),
        ("newPasswordVerification", form.new_password_verification.as_str()),
    ];
    let errors = shop_account_rules().validate(&submission);
    if !errors.is_empty() {
        Flash::failure(errors).set(&session).await?;
        return Ok(Redirect::to(&back).into_response());
    }

    let Some(mut account) = state.store().find_by_id(AccountId::new(id)).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };
    // The rule set already vetted the address.
    let Ok(mail) = Email::parse(form.mail.trim()) else {
        return Ok(Redirect::to(&back).into_response());
    };

    account.company_name_slug = slugify(&form.company_name);
    account.company_name = form.company_name;
    account.login = form.login;
    account.mail = mail;
    if !form.new_password.is_empty() {
        account.password_hash = hash_password(&form.new_password)?;
    }
    state.store().update(&account).await?;

    Flash::success().set(&session).await?;
    Ok(Redirect::to(&back).into_response())
}

// ============================================================================
// Account creation and deletion
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateAccountForm {
    #[serde(default, rename = "companyName")]
    pub company_name: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub mail: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "passwordVerification")]
    pub password_verification: String,
}

fn create_account_rules() -> RuleSet {
    RuleSet::new()
        .rule(
            "companyName",
            "Le nom du magasin ne peut pas être vide.",
            Rule::Required,
        )
        .rule("login", "Le login ne peut pas être vide.", Rule::Required)
        .rule("mail", "L'adresse mail ne peut pas être vide.", Rule::Required)
        .rule_if_present("mail", "L'adresse mail est invalide.", Rule::Email)
        .rule("password", "Le mot de passe ne peut pas être vide.", Rule::Required)
        .rule(
            "password",
            "Le mot de passe doit faire entre 6 et 20 caractères.",
            Rule::Len(6, 20),
        )
        .rule(
            "password",
            "Les deux mots de passe ne correspondent pas.",
            Rule::EqualsField("passwordVerification"),
        )
        .rule(
            "passwordVerification",
            "La vérification ne peut pas être vide.",
            Rule::Required,
        )
}

/// `GET /dashboard/creation-compte-magasin` - the account creation form,
/// refilled with the previous failed submission.
pub async fn create_account_page(
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
) -> Result<CreateAccountTemplate, AppError> {
    let flash = Flash::take(&session).await?;
    let field = |name: &str| flash.last_post_item.get(name).cloned().unwrap_or_default();
    Ok(CreateAccountTemplate {
        last_company_name: field("companyName"),
        last_login: field("login"),
        last_mail: field("mail"),
        flash,
    })
}

/// `POST /dashboard/creation-compte-magasin` - create a shop account.
///
/// On validation failure the text fields (never the passwords) are echoed
/// back through the flash so the form can be refilled.
pub async fn create_account(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    Form(form): Form<CreateAccountForm>,
) -> Result<Response, AppError> {
    let echo = || {
        [
            ("companyName".to_string(), form.company_name.clone()),
            ("login".to_string(), form.login.clone()),
            ("mail".to_string(), form.mail.clone()),
        ]
        .into_iter()
        .collect()
    };

    let submission = [
        ("companyName", form.company_name.as_str()),
        ("login", form.login.as_str()),
        ("mail", form.mail.as_str()),
        ("password", form.password.as_str()),
        ("passwordVerification", form.password_verification.as_str()),
    ];
    let errors = create_account_rules().validate(&submission);
    if !errors.is_empty() {
        Flash::failure_with_echo(errors, echo()).set(&session).await?;
        return Ok(Redirect::to(CREATE_ACCOUNT_URL).into_response());
    }

    // The rule set already vetted the address.
    let Ok(mail) = Email::parse(form.mail.trim()) else {
        return Ok(Redirect::to(CREATE_ACCOUNT_URL).into_response());
    };

    let new_account = NewAccount {
        is_super_admin: false,
        company_name_slug: slugify(&form.company_name),
        company_name: form.company_name.clone(),
        mail,
        login: form.login.clone(),
        password_hash: hash_password(&form.password)?,
    };

    match state.store().create(new_account).await {
        Ok(_) => Flash::success().set(&session).await?,
        Err(StoreError::Conflict(field)) => {
            let error = match field {
                ConflictField::Login => FieldError::new("login", "Ce login est déjà utilisé."),
                ConflictField::Slug => {
                    FieldError::new("companyName", "Ce nom de magasin est déjà utilisé.")
                }
            };
            Flash::failure_with_echo(vec![error], echo()).set(&session).await?;
        }
        Err(e) => return Err(AppError::Store(e)),
    }

    Ok(Redirect::to(CREATE_ACCOUNT_URL).into_response())
}

/// `GET /dashboard/delete/{id}` - delete an account and its logo files.
pub async fn delete(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    delete_account(state.store(), state.media(), AccountId::new(id)).await?;
    Ok(Redirect::to("/dashboard"))
}

// ============================================================================
// Site assets
// ============================================================================

/// `GET /dashboard/modification-elements-site` - the district map form.
pub async fn site_assets_page(
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
) -> Result<SiteAssetsTemplate, AppError> {
    Ok(SiteAssetsTemplate {
        flash: Flash::take(&session).await?,
    })
}

/// `POST /dashboard/modification-elements-site` - replace the district map.
///
/// A rejected upload (wrong extension, oversized, broken stream) is logged
/// and otherwise ignored; the submission always answers with a redirect
/// back to the form.
pub async fn upload_map(
    State(state): State<AppState>,
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    match read_upload_form(&mut multipart, "plan").await {
        Ok(form) => {
            if let Some(file) = form.file {
                match state.media().store_map_image(&file).await {
                    Ok(()) => Flash::success().set(&session).await?,
                    Err(e) => tracing::warn!(error = %e, "map image upload rejected"),
                }
            }
        }
        Err(e) => tracing::warn!(error = %e, "map image upload rejected"),
    }
    Ok(Redirect::to(SITE_ASSETS_URL))
}

// ============================================================================
// Super-admin password
// ============================================================================

/// `GET /dashboard/modification-mot-de-passe-superadmin`.
pub async fn password_page(
    RequireSuperAdmin(_): RequireSuperAdmin,
    session: Session,
) -> Result<PasswordFormTemplate, AppError> {
    Ok(PasswordFormTemplate {
        title: "Mot de passe super-administrateur",
        action: ADMIN_PASSWORD_URL,
        flash: Flash::take(&session).await?,
    })
}

/// `POST /dashboard/modification-mot-de-passe-superadmin`.
pub async fn change_password(
    State(state): State<AppState>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    session: Session,
    Form(form): Form<PasswordForm>,
) -> Result<Response, AppError> {
    handle_password_post(&state, &session, user.id, &form, ADMIN_PASSWORD_URL).await
}
