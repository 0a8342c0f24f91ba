//! HTTP routes.
//!
//! | Method | Path | Guard | Handler |
//! |--------|------|-------|---------|
//! | GET | `/` | - | [`public::home`] |
//! | GET | `/entreprise/administration` | - | [`public::reserved_company`] |
//! | GET | `/entreprise/{slug}` | - | [`public::company_page`] |
//! | GET+POST | `/login` | - | [`auth::login_page`], [`auth::login`] |
//! | GET | `/logout` | - | [`auth::logout`] |
//! | GET | `/dashboard` | super-admin | [`dashboard::home`] |
//! | GET | `/dashboard/update/{id}` | super-admin | [`dashboard::update_page`] |
//! | POST | `/dashboard/update` | super-admin | [`dashboard::update`] |
//! | POST | `/dashboard/update/logo` | super-admin | [`dashboard::upload_logo`] |
//! | GET | `/dashboard/shop-update/{id}` | super-admin | [`dashboard::shop_update_page`] |
//! | POST | `/dashboard/shop-update` | super-admin | [`dashboard::shop_update`] |
//! | GET | `/dashboard/delete/{id}` | super-admin | [`dashboard::delete`] |
//! | GET+POST | `/dashboard/creation-compte-magasin` | super-admin | [`dashboard::create_account_page`], [`dashboard::create_account`] |
//! | GET+POST | `/dashboard/modification-elements-site` | super-admin | [`dashboard::site_assets_page`], [`dashboard::upload_map`] |
//! | GET+POST | `/dashboard/modification-mot-de-passe-superadmin` | super-admin | [`dashboard::password_page`], [`dashboard::change_password`] |
//! | GET+POST | `/dashboard/contenu-magasin` | login | [`shop::content_page`], [`shop::update_content`] |
//! | POST | `/dashboard/contenu-magasin/logo` | login | [`shop::upload_logo`] |
//! | GET+POST | `/dashboard/modification-mot-de-passe-magasin` | login | [`shop::password_page`], [`shop::change_password`] |
//!
//! Guards are extractors, not layers: a shop user on a super-admin route is
//! soft-denied with the shop dashboard, an anonymous user is redirected to
//! `/login`.

pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod public;
pub mod shop;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};

use crate::services::uploads::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Request-body ceiling on the upload routes. Axum's default body limit
/// (2 MB) sits below the accepted file size, so those routes raise it to
/// the file ceiling plus multipart framing overhead; oversized files are
/// then rejected by the pipeline's own size check.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::home))
        .route("/entreprise/administration", get(public::reserved_company))
        .route("/entreprise/{slug}", get(public::company_page))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::home))
        .route("/dashboard/update/{id}", get(dashboard::update_page))
        .route("/dashboard/update", post(dashboard::update))
        .route(
            "/dashboard/update/logo",
            post(dashboard::upload_logo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/dashboard/shop-update/{id}", get(dashboard::shop_update_page))
        .route("/dashboard/shop-update", post(dashboard::shop_update))
        .route("/dashboard/delete/{id}", get(dashboard::delete))
        .route(
            "/dashboard/creation-compte-magasin",
            get(dashboard::create_account_page).post(dashboard::create_account),
        )
        .route(
            "/dashboard/modification-elements-site",
            get(dashboard::site_assets_page)
                .post(dashboard::upload_map)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/dashboard/modification-mot-de-passe-superadmin",
            get(dashboard::password_page).post(dashboard::change_password),
        )
        .route(
            "/dashboard/contenu-magasin",
            get(shop::content_page).post(shop::update_content),
        )
        .route(
            "/dashboard/contenu-magasin/logo",
            post(shop::upload_logo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/dashboard/modification-mot-de-passe-magasin",
            get(shop::password_page).post(shop::change_password),
        )
        .fallback(public::not_found)
}
