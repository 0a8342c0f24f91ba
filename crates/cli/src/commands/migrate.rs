//! Database migration command.
//!
//! Runs the SQL migrations from `crates/server/migrations/`, then lets the
//! tower-sessions store create its own `session` table.
//!
//! # Environment Variables
//!
//! - `QUARTIER_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session store error: {0}")]
    SessionStore(String),
}

/// Run all database migrations.
///
/// # Errors
///
/// Returns `MigrateError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), MigrateError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    let store = PostgresStore::new(pool.clone())
        .with_table_name("session")
        .map_err(|e| MigrateError::SessionStore(e.to_string()))?;
    store
        .migrate()
        .await
        .map_err(|e| MigrateError::SessionStore(e.to_string()))?;

    tracing::info!("Migrations complete");
    Ok(())
}

fn database_url() -> Result<String, MigrateError> {
    std::env::var("QUARTIER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| MigrateError::MissingEnvVar("QUARTIER_DATABASE_URL"))
}
