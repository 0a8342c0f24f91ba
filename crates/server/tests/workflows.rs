//! End-to-end workflow tests over the full router.
//!
//! The application is assembled in-process with the in-memory account
//! store, a memory session store and a temporary media directory, then
//! driven through `tower::ServiceExt::oneshot`. Session cookies are
//! forwarded by hand, so login, flash and logout behave as in production.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use quartier_core::{Email, slugify};
use quartier_server::db::{AccountStore, MemoryAccountStore};
use quartier_server::models::NewAccount;
use quartier_server::routes;
use quartier_server::services::auth::{hash_password, verify_password};
use quartier_server::services::uploads::MediaStore;
use quartier_server::state::AppState;

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    router: Router,
    store: Arc<MemoryAccountStore>,
    media: MediaStore,
    _media_dir: tempfile::TempDir,
}

impl TestApp {
    fn new() -> Self {
        let media_dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(media_dir.path().join("site"), media_dir.path().join("logo"));
        let store = Arc::new(MemoryAccountStore::new());
        let state = AppState::new(store.clone(), media.clone());

        let session_layer = SessionManagerLayer::new(MemoryStore::default());
        let router = routes::routes().layer(session_layer).with_state(state);

        Self {
            router,
            store,
            media,
            _media_dir: media_dir,
        }
    }

    async fn seed_account(&self, name: &str, login: &str, password: &str, super_admin: bool) -> i32 {
        let account = self
            .store
            .create(NewAccount {
                is_super_admin: super_admin,
                company_name: name.to_string(),
                company_name_slug: slugify(name),
                mail: Email::parse(&format!("{login}@example.com")).unwrap(),
                login: login.to_string(),
                password_hash: hash_password(password).unwrap(),
            })
            .await
            .unwrap();
        account.id.as_i32()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::get(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_form(&self, uri: &str, body: String, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    async fn post_multipart(&self, uri: &str, body: String, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::post(uri).header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body)).unwrap())
            .await
            .unwrap()
    }

    /// Log in and return the session cookie.
    async fn login(&self, login: &str, password: &str) -> String {
        let response = self
            .post_form(
                "/login",
                format!("login={login}&password={password}"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard");
        session_cookie(&response)
    }
}

const BOUNDARY: &str = "testformboundary";

/// A multipart body with optional text fields and one file field.
fn multipart_body(fields: &[(&str, &str)], file_field: &str, filename: &str, data: &[u8]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{file_field}\"; \
         filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    ));
    body.push_str(std::str::from_utf8(data).unwrap());
    body.push_str(&format!("\r\n--{BOUNDARY}--\r\n"));
    body
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn session_cookie(response: &Response<Body>) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("response should carry a session cookie");
    raw.split(';').next().unwrap().to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

// ============================================================================
// Public pages
// ============================================================================

#[tokio::test]
async fn test_home_lists_companies_without_super_admin() {
    let app = TestApp::new();
    app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    app.seed_account("Atelier Bois", "atelier", "motdepasse", false).await;
    app.seed_account("Administration", "admin", "motdepasse", true).await;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Atelier Bois"));
    assert!(body.contains("Zinc Bar"));
    assert!(!body.contains("Administration"));
    // Alphabetical order.
    assert!(body.find("Atelier Bois").unwrap() < body.find("Zinc Bar").unwrap());
}

#[tokio::test]
async fn test_company_page_and_unknown_slug() {
    let app = TestApp::new();
    let id = app.seed_account("Café de l'Érable", "cafe", "motdepasse", false).await;
    let mut account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    account.page.presentation = "Torréfaction artisanale".to_string();
    app.store.update(&account).await.unwrap();

    let response = app.get("/entreprise/cafe-de-lerable", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Torréfaction artisanale"));

    let response = app.get("/entreprise/inconnue", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_reserved_company_path_redirects() {
    let app = TestApp::new();
    let response = app.get("/entreprise/administration", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_unmatched_path_renders_not_found() {
    let app = TestApp::new();
    let response = app.get("/nulle-part", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_text(response).await;
    assert!(body.contains("introuvable"));
}

// ============================================================================
// Authentication and guards
// ============================================================================

#[tokio::test]
async fn test_dashboard_requires_login() {
    let app = TestApp::new();
    let response = app.get("/dashboard", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_bad_credentials_flash_on_login_page() {
    let app = TestApp::new();
    app.seed_account("Presse", "presse", "motdepasse", false).await;

    let response = app
        .post_form("/login", "login=presse&password=mauvais".to_string(), None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response);

    let body = body_text(app.get("/login", Some(&cookie)).await).await;
    assert!(body.contains("Identifiants incorrects."));

    // The flash is one-shot.
    let body = body_text(app.get("/login", Some(&cookie)).await).await;
    assert!(!body.contains("Identifiants incorrects."));
}

#[tokio::test]
async fn test_shop_user_soft_denied_on_admin_routes() {
    let app = TestApp::new();
    app.seed_account("Atelier Bois", "atelier", "motdepasse", false).await;
    let cookie = app.login("atelier", "motdepasse").await;

    // /dashboard and every admin page render the shop dashboard instead.
    for uri in ["/dashboard", "/dashboard/creation-compte-magasin", "/dashboard/update/1"] {
        let response = app.get(uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains("Bonjour Atelier Bois"), "{uri}");
    }
}

#[tokio::test]
async fn test_logout_drops_the_session() {
    let app = TestApp::new();
    app.seed_account("Presse", "presse", "motdepasse", false).await;
    let cookie = app.login("presse", "motdepasse").await;

    let response = app.get("/logout", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = app.get("/dashboard", Some(&cookie)).await;
    assert_eq!(location(&response), "/login");
}

// ============================================================================
// Profile workflow
// ============================================================================

#[tokio::test]
async fn test_profile_update_persists_and_flashes_success() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "id={id}&presentation={}&address={}&schedule=&website={}&facebook=&twitter=&instagram=&leftIndicator=40&rightIndicator=60",
        encode("Bar de quartier"),
        encode("3 rue des Halles"),
        encode("https://zincbar.example.com"),
    );
    let response = app.post_form("/dashboard/update", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/dashboard/update/{id}"));

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.page.presentation, "Bar de quartier");
    assert_eq!(account.page.address, "3 rue des Halles");
    assert_eq!(account.page.contact.website, "https://zincbar.example.com");
    assert_eq!(account.left_indicator, Some(40));
    assert_eq!(account.right_indicator, Some(60));

    let body = body_text(app.get(&format!("/dashboard/update/{id}"), Some(&cookie)).await).await;
    assert!(body.contains("Modifications enregistrées."));
}

#[tokio::test]
async fn test_profile_update_invalid_website_writes_nothing() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "id={id}&presentation={}&website=pas une url&leftIndicator=150",
        encode("Bar de quartier"),
    );
    let response = app.post_form("/dashboard/update", body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.page.presentation, "");
    assert_eq!(account.left_indicator, None);

    let body = body_text(app.get(&format!("/dashboard/update/{id}"), Some(&cookie)).await).await;
    assert!(body.contains("Le lien du site web est invalide."));
    assert!(body.contains("entre 0 et 100"));
}

#[tokio::test]
async fn test_shop_edits_its_own_account_only() {
    let app = TestApp::new();
    let shop_id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let other_id = app.seed_account("Atelier Bois", "atelier", "motdepasse", false).await;
    let cookie = app.login("zinc", "motdepasse").await;

    // A forged id in the form is ignored: the session account is the target.
    let body = format!("id={other_id}&presentation={}", encode("Texte du zinc"));
    let response = app
        .post_form("/dashboard/contenu-magasin", body, Some(&cookie))
        .await;
    assert_eq!(location(&response), "/dashboard/contenu-magasin");

    let own = app
        .store
        .find_by_id(quartier_core::AccountId::new(shop_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(own.page.presentation, "Texte du zinc");

    let other = app
        .store
        .find_by_id(quartier_core::AccountId::new(other_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(other.page.presentation, "");
}

// ============================================================================
// Logo uploads
// ============================================================================

#[tokio::test]
async fn test_logo_upload_rejects_gif_and_stores_png() {
    let app = TestApp::new();
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("zinc", "motdepasse").await;

    let body = multipart_body(&[], "logo", "logo.gif", b"gifdata");
    let response = app
        .post_multipart("/dashboard/contenu-magasin/logo", body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.logo, "");

    let body = multipart_body(&[], "logo", "IMG_0042.PNG", b"pngdata");
    app.post_multipart("/dashboard/contenu-magasin/logo", body, Some(&cookie))
        .await;

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.logo, "zinc-bar.png");
    assert!(app.media.logo_dir().join("zinc-bar.png").exists());
}

#[tokio::test]
async fn test_logo_upload_accepts_files_above_two_megabytes() {
    let app = TestApp::new();
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("zinc", "motdepasse").await;

    // Larger than axum's default body limit, smaller than the pipeline's.
    let data = vec![b'a'; 3_000_000];
    let body = multipart_body(&[], "logo", "logo.png", &data);
    let response = app
        .post_multipart("/dashboard/contenu-magasin/logo", body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.logo, "zinc-bar.png");
    assert!(app.media.logo_dir().join("zinc-bar.png").exists());
}

#[tokio::test]
async fn test_admin_uploads_logo_for_a_company() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = multipart_body(&[("id", &id.to_string())], "logo", "logo.jpg", b"jpegdata");
    let response = app
        .post_multipart("/dashboard/update/logo", body, Some(&cookie))
        .await;
    assert_eq!(location(&response), format!("/dashboard/update/{id}"));

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.logo, "zinc-bar.jpg");
}

// ============================================================================
// Account creation and deletion
// ============================================================================

#[tokio::test]
async fn test_create_account_echoes_failed_submission() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "companyName={}&login=fleuriste&mail=fleuriste@example.com&password=abc123&passwordVerification=abc124",
        encode("Au Bouquet"),
    );
    let response = app
        .post_form("/dashboard/creation-compte-magasin", body, Some(&cookie))
        .await;
    assert_eq!(location(&response), "/dashboard/creation-compte-magasin");

    let body = body_text(
        app.get("/dashboard/creation-compte-magasin", Some(&cookie)).await,
    )
    .await;
    assert!(body.contains("Les deux mots de passe ne correspondent pas."));
    // Text fields are refilled, passwords never are.
    assert!(body.contains("Au Bouquet"));
    assert!(body.contains("fleuriste@example.com"));
    assert!(!body.contains("abc123"));

    assert!(app.store.find_by_login("fleuriste").await.unwrap().is_none());
}

#[tokio::test]
async fn test_create_account_persists_with_slug() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "companyName={}&login=bouquet&mail=bouquet@example.com&password=abc123&passwordVerification=abc123",
        encode("Au Bouquet d'Été"),
    );
    app.post_form("/dashboard/creation-compte-magasin", body, Some(&cookie))
        .await;

    let account = app.store.find_by_login("bouquet").await.unwrap().unwrap();
    assert_eq!(account.company_name, "Au Bouquet d'Été");
    assert_eq!(account.company_name_slug, "au-bouquet-dete");
    assert!(!account.is_super_admin);
    assert!(verify_password("abc123", &account.password_hash).is_ok());
}

#[tokio::test]
async fn test_duplicate_login_is_flashed_not_fatal() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body =
        "companyName=Doublon&login=zinc&mail=doublon@example.com&password=abc123&passwordVerification=abc123"
            .to_string();
    let response = app
        .post_form("/dashboard/creation-compte-magasin", body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let body = body_text(
        app.get("/dashboard/creation-compte-magasin", Some(&cookie)).await,
    )
    .await;
    assert!(body.contains("Ce login est déjà utilisé."));
}

#[tokio::test]
async fn test_duplicate_company_name_is_flashed_on_its_field() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    // Same slug as the existing company, different login.
    let body = format!(
        "companyName={}&login=autre&mail=autre@example.com&password=abc123&passwordVerification=abc123",
        encode("ZINC BAR"),
    );
    app.post_form("/dashboard/creation-compte-magasin", body, Some(&cookie))
        .await;

    let body = body_text(
        app.get("/dashboard/creation-compte-magasin", Some(&cookie)).await,
    )
    .await;
    assert!(body.contains("Ce nom de magasin est déjà utilisé."));
    assert!(!body.contains("Ce login est déjà utilisé."));
    assert!(app.store.find_by_login("autre").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_requires_super_admin_and_sweeps_logo() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;

    // Upload a logo as the shop first.
    let shop_cookie = app.login("zinc", "motdepasse").await;
    let body = multipart_body(&[], "logo", "logo.png", b"pngdata");
    app.post_multipart("/dashboard/contenu-magasin/logo", body, Some(&shop_cookie))
        .await;
    assert!(app.media.logo_dir().join("zinc-bar.png").exists());

    // A shop user asking for the delete route is soft-denied.
    let response = app.get(&format!("/dashboard/delete/{id}"), Some(&shop_cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .is_some());

    // The super-admin deletion removes the record and the files.
    let admin_cookie = app.login("admin", "motdepasse").await;
    let response = app.get(&format!("/dashboard/delete/{id}"), Some(&admin_cookie)).await;
    assert_eq!(location(&response), "/dashboard");
    assert!(app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .is_none());
    assert!(!app.media.logo_dir().join("zinc-bar.png").exists());
}

// ============================================================================
// Account edits and passwords
// ============================================================================

#[tokio::test]
async fn test_shop_update_recomputes_slug_and_keeps_password() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "id={id}&companyName={}&login=zinc&mail=zinc@example.com&newPassword=&newPasswordVerification=",
        encode("Café du Zinc"),
    );
    let response = app.post_form("/dashboard/shop-update", body, Some(&cookie)).await;
    assert_eq!(location(&response), format!("/dashboard/shop-update/{id}"));

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.company_name, "Café du Zinc");
    assert_eq!(account.company_name_slug, "cafe-du-zinc");
    // An empty newPassword leaves the stored hash alone.
    assert!(verify_password("motdepasse", &account.password_hash).is_ok());
}

#[tokio::test]
async fn test_shop_update_rehashes_submitted_password() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "id={id}&companyName={}&login=zinc&mail=zinc@example.com&newPassword=nouveau1&newPasswordVerification=nouveau1",
        encode("Zinc Bar"),
    );
    app.post_form("/dashboard/shop-update", body, Some(&cookie)).await;

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("nouveau1", &account.password_hash).is_ok());
}

#[tokio::test]
async fn test_shop_update_rejects_whitespace_password() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("admin", "motdepasse").await;

    let body = format!(
        "id={id}&companyName={}&login=zinc&mail=zinc@example.com&newPassword={}&newPasswordVerification={}",
        encode("Zinc Bar"),
        encode(" "),
        encode(" "),
    );
    app.post_form("/dashboard/shop-update", body, Some(&cookie)).await;

    let body = body_text(
        app.get(&format!("/dashboard/shop-update/{id}"), Some(&cookie)).await,
    )
    .await;
    assert!(body.contains("Le mot de passe doit faire entre 6 et 20 caractères."));

    // The stored hash was not replaced by a one-space password.
    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("motdepasse", &account.password_hash).is_ok());
}

#[tokio::test]
async fn test_password_change_checks_old_password() {
    let app = TestApp::new();
    let id = app.seed_account("Zinc Bar", "zinc", "motdepasse", false).await;
    let cookie = app.login("zinc", "motdepasse").await;

    let response = app
        .post_form(
            "/dashboard/modification-mot-de-passe-magasin",
            "oldPassword=mauvais&newPassword=nouveau1&newPasswordVerification=nouveau1".to_string(),
            Some(&cookie),
        )
        .await;
    assert_eq!(location(&response), "/dashboard/modification-mot-de-passe-magasin");

    let body = body_text(
        app.get("/dashboard/modification-mot-de-passe-magasin", Some(&cookie)).await,
    )
    .await;
    // The leading apostrophe is HTML-escaped in the rendered page.
    assert!(body.contains("ancien mot de passe est incorrect."));

    app.post_form(
        "/dashboard/modification-mot-de-passe-magasin",
        "oldPassword=motdepasse&newPassword=nouveau1&newPasswordVerification=nouveau1".to_string(),
        Some(&cookie),
    )
    .await;

    let account = app
        .store
        .find_by_id(quartier_core::AccountId::new(id))
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("nouveau1", &account.password_hash).is_ok());
}

// ============================================================================
// Site assets
// ============================================================================

#[tokio::test]
async fn test_map_upload_is_permissive_and_fixed_name() {
    let app = TestApp::new();
    app.seed_account("Administration", "admin", "motdepasse", true).await;
    let cookie = app.login("admin", "motdepasse").await;

    // A rejected extension is ignored, the submission still redirects.
    let body = multipart_body(&[], "plan", "plan.png", b"pngdata");
    let response = app
        .post_multipart("/dashboard/modification-elements-site", body, Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard/modification-elements-site");
    assert!(!app.media.site_assets_dir().join("plan.jpg").exists());

    // An accepted upload lands under the fixed name whatever the original.
    let body = multipart_body(&[], "plan", "nouveau-plan.jpg", b"jpegdata");
    app.post_multipart("/dashboard/modification-elements-site", body, Some(&cookie))
        .await;
    assert!(app.media.site_assets_dir().join("plan.jpg").exists());

    let response = app
        .get("/dashboard/modification-elements-site", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Modifications enregistrées."));
}
