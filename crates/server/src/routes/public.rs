//! Public pages: the district map with its company listing, the company
//! pages, and the not-found fallback.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::AppError;
use crate::middleware::OptionalUser;
use crate::models::Account;
use crate::state::AppState;

/// One company entry on the home page.
struct CompanyCard {
    name: String,
    slug: String,
    logo: String,
    has_pin: bool,
    left: i32,
    right: i32,
}

impl From<&Account> for CompanyCard {
    fn from(account: &Account) -> Self {
        let pin = account.left_indicator.zip(account.right_indicator);
        Self {
            name: account.company_name.clone(),
            slug: account.company_name_slug.clone(),
            logo: account.logo.clone(),
            has_pin: pin.is_some(),
            left: pin.map_or(0, |(left, _)| left),
            right: pin.map_or(0, |(_, right)| right),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
struct IndexTemplate {
    logged_in: bool,
    companies: Vec<CompanyCard>,
}

#[derive(Template, WebTemplate)]
#[template(path = "entreprise.html")]
struct CompanyTemplate {
    logged_in: bool,
    name: String,
    logo: String,
    presentation: String,
    address: String,
    schedule: String,
    website: String,
    facebook: String,
    twitter: String,
    instagram: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate;

/// `GET /` - the district map and the company listing.
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state.store().find_public().await?;
    Ok(IndexTemplate {
        logged_in: user.is_some(),
        companies: accounts.iter().map(CompanyCard::from).collect(),
    })
}

/// `GET /entreprise/administration` - reserved path, never a company page.
pub async fn reserved_company() -> Redirect {
    Redirect::to("/")
}

/// `GET /entreprise/{slug}` - a company's public page. Unknown slugs go
/// back to the listing.
pub async fn company_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(account) = state.store().find_by_slug(&slug).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(CompanyTemplate {
        logged_in: user.is_some(),
        name: account.company_name,
        logo: account.logo,
        presentation: account.page.presentation,
        address: account.page.address,
        schedule: account.page.schedule,
        website: account.page.contact.website,
        facebook: account.page.contact.facebook,
        twitter: account.page.contact.twitter,
        instagram: account.page.contact.instagram,
    }
    .into_response())
}

/// Fallback for every unmatched path.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}
