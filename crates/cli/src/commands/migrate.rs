//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! fek migrate sessions
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection
//!   string for the session store

use food_en_k_storefront::db;
use secrecy::SecretString;

/// Errors from migration commands.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

fn database_url() -> Result<SecretString, MigrationError> {
    std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MigrationError::MissingEnvVar("STOREFRONT_DATABASE_URL"))
}

/// Create the `tower_sessions` schema and session table.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the database cannot be
/// reached, or the statements fail.
pub async fn sessions() -> Result<(), MigrationError> {
    let _ = dotenvy::dotenv();
    let url = database_url()?;

    tracing::info!("Connecting to session database...");
    let pool = db::create_pool(&url).await?;

    tracing::info!("Creating session table...");
    db::migrate_sessions(&pool).await?;

    tracing::info!("Session store ready");
    Ok(())
}
