//! Form payloads and write workflows shared by the super-admin and shop
//! controllers.
//!
//! The same profile, password and logo submissions exist twice in the route
//! table (once under the super-admin dashboard, once under the shop
//! dashboard); only the target account and the redirect-back URL differ.
//! Each workflow here takes both as parameters so the two controllers stay
//! thin.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use tower_sessions::Session;

use quartier_core::AccountId;

use crate::error::AppError;
use crate::models::{Account, Flash};
use crate::services::accounts::{ProfileUpdate, apply_profile};
use crate::services::auth;
use crate::services::uploads::UploadedFile;
use crate::state::AppState;
use crate::validate::{Rule, RuleSet};

// ============================================================================
// Form payloads
// ============================================================================

/// Public-page content submission.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub presentation: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub facebook: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default, rename = "leftIndicator")]
    pub left_indicator: String,
    #[serde(default, rename = "rightIndicator")]
    pub right_indicator: String,
}

/// Password-change submission.
#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default, rename = "oldPassword")]
    pub old_password: String,
    #[serde(default, rename = "newPassword")]
    pub new_password: String,
    #[serde(default, rename = "newPasswordVerification")]
    pub new_password_verification: String,
}

// ============================================================================
// Shared templates
// ============================================================================

/// Account fields as the forms render them: everything stringly, indicators
/// empty when unset.
pub struct AccountView {
    pub id: i32,
    pub company_name: String,
    pub login: String,
    pub mail: String,
    pub logo: String,
    pub presentation: String,
    pub address: String,
    pub schedule: String,
    pub website: String,
    pub facebook: String,
    pub twitter: String,
    pub instagram: String,
    pub left_indicator: String,
    pub right_indicator: String,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.as_i32(),
            company_name: account.company_name.clone(),
            login: account.login.clone(),
            mail: account.mail.to_string(),
            logo: account.logo.clone(),
            presentation: account.page.presentation.clone(),
            address: account.page.address.clone(),
            schedule: account.page.schedule.clone(),
            website: account.page.contact.website.clone(),
            facebook: account.page.contact.facebook.clone(),
            twitter: account.page.contact.twitter.clone(),
            instagram: account.page.contact.instagram.clone(),
            left_indicator: account.left_indicator.map(|n| n.to_string()).unwrap_or_default(),
            right_indicator: account.right_indicator.map(|n| n.to_string()).unwrap_or_default(),
        }
    }
}

/// Public-page content form, shared by both dashboards.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/profile_form.html")]
pub struct ProfileFormTemplate {
    pub title: &'static str,
    pub action: &'static str,
    pub logo_action: &'static str,
    pub account: AccountView,
    pub flash: Flash,
}

/// Password-change form, shared by both dashboards.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/password_form.html")]
pub struct PasswordFormTemplate {
    pub title: &'static str,
    pub action: &'static str,
    pub flash: Flash,
}

// ============================================================================
// Rule sets
// ============================================================================

/// Rules for the public-page content forms.
pub fn profile_rules() -> RuleSet {
    RuleSet::new()
        .rule(
            "presentation",
            "La présentation ne peut pas être vide.",
            Rule::Required,
        )
        .rule_if_present("website", "Le lien du site web est invalide.", Rule::Url)
        .rule_if_present("facebook", "Le lien Facebook est invalide.", Rule::Url)
        .rule_if_present("twitter", "Le lien Twitter est invalide.", Rule::Url)
        .rule_if_present("instagram", "Le lien Instagram est invalide.", Rule::Url)
        .rule_if_present(
            "leftIndicator",
            "La position horizontale doit être un nombre.",
            Rule::Int,
        )
        .rule_if_present(
            "leftIndicator",
            "La position horizontale doit être comprise entre 0 et 100.",
            Rule::IntRange(0, 100),
        )
        .rule_if_present(
            "rightIndicator",
            "La position verticale doit être un nombre.",
            Rule::Int,
        )
        .rule_if_present(
            "rightIndicator",
            "La position verticale doit être comprise entre 0 et 100.",
            Rule::IntRange(0, 100),
        )
}

/// Rules for the password-change forms. The old-password check needs the
/// stored hash of the account being changed.
pub fn password_rules(stored_hash: String) -> RuleSet {
    RuleSet::new()
        .rule(
            "oldPassword",
            "L'ancien mot de passe est incorrect.",
            Rule::MatchesHash(stored_hash),
        )
        .rule(
            "newPassword",
            "Le nouveau mot de passe ne peut pas être vide.",
            Rule::Required,
        )
        .rule(
            "newPassword",
            "Le mot de passe doit faire entre 6 et 20 caractères.",
            Rule::Len(6, 20),
        )
        .rule(
            "newPassword",
            "Les deux mots de passe ne correspondent pas.",
            Rule::EqualsField("newPasswordVerification"),
        )
        .rule(
            "newPasswordVerification",
            "La vérification ne peut pas être vide.",
            Rule::Required,
        )
}

// ============================================================================
// Write workflows
// ============================================================================

/// Indicator fields arrive as text; the rule set already vetted them as
/// in-range integers or empty.
fn parse_indicator(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Validate and persist a public-page content submission for `target`.
///
/// On validation failure the errors are flashed and nothing is written.
/// Either way the response is a redirect back to `back`.
///
/// # Errors
///
/// Returns `AppError` on store or session failures.
pub async fn handle_profile_post(
    state: &AppState,
    session: &Session,
    target: AccountId,
    form: &ProfileForm,
    back: &str,
) -> Result<Response, AppError> {
    let submission = [
        ("presentation", form.presentation.as_str()),
        ("website", form.website.as_str()),
        ("facebook", form.facebook.as_str()),
        ("twitter", form.twitter.as_str()),
        ("instagram", form.instagram.as_str()),
        ("leftIndicator", form.left_indicator.as_str()),
        ("rightIndicator", form.right_indicator.as_str()),
    ];
    let errors = profile_rules().validate(&submission);
    if !errors.is_empty() {
        Flash::failure(errors).set(session).await?;
        return Ok(Redirect::to(back).into_response());
    }

    let Some(mut account) = state.store().find_by_id(target).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    apply_profile(
        &mut account,
        ProfileUpdate {
            presentation: form.presentation.clone(),
            address: form.address.clone(),
            schedule: form.schedule.clone(),
            website: form.website.clone(),
            facebook: form.facebook.clone(),
            twitter: form.twitter.clone(),
            instagram: form.instagram.clone(),
            left_indicator: parse_indicator(&form.left_indicator),
            right_indicator: parse_indicator(&form.right_indicator),
        },
    );
    state.store().update(&account).await?;

    Flash::success().set(session).await?;
    Ok(Redirect::to(back).into_response())
}

/// Validate and persist a password change for `target`.
///
/// # Errors
///
/// Returns `AppError` on store, hashing or session failures.
pub async fn handle_password_post(
    state: &AppState,
    session: &Session,
    target: AccountId,
    form: &PasswordForm,
    back: &str,
) -> Result<Response, AppError> {
    let Some(mut account) = state.store().find_by_id(target).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let submission = [
        ("oldPassword", form.old_password.as_str()),
        ("newPassword", form.new_password.as_str()),
        ("newPasswordVerification", form.new_password_verification.as_str()),
    ];
    let errors = password_rules(account.password_hash.clone()).validate(&submission);
    if !errors.is_empty() {
        Flash::failure(errors).set(session).await?;
        return Ok(Redirect::to(back).into_response());
    }

    account.password_hash = auth::hash_password(&form.new_password)?;
    state.store().update(&account).await?;

    Flash::success().set(session).await?;
    Ok(Redirect::to(back).into_response())
}

/// Store an uploaded logo for `target` and record its filename.
///
/// A missing or rejected file leaves the account untouched; the submission
/// still answers with a redirect back to `back`.
///
/// # Errors
///
/// Returns `AppError` on store failures.
pub async fn handle_logo_upload(
    state: &AppState,
    target: AccountId,
    file: Option<&UploadedFile>,
    back: &str,
) -> Result<Response, AppError> {
    let Some(mut account) = state.store().find_by_id(target).await? else {
        return Ok(Redirect::to("/dashboard").into_response());
    };

    if let Some(file) = file {
        match state.media().store_logo(&account.company_name_slug, file).await {
            Ok(filename) => {
                account.logo = filename;
                state.store().update(&account).await?;
            }
            Err(e) => {
                tracing::warn!(account_id = %target, error = %e, "logo upload rejected");
            }
        }
    }

    Ok(Redirect::to(back).into_response())
}
