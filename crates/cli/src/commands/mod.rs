//! CLI command implementations.

pub mod inquiry;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use wholesale_bridge_admin::config::ConfigError;
use wholesale_bridge_admin::db::{self, RepositoryError};
use wholesale_bridge_admin::services::ApprovalError;
use wholesale_bridge_admin::shopify::AdminShopifyError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    #[error("Approval failed: {0}")]
    Approval(#[from] ApprovalError),

    /// Invalid command argument.
    #[error("Invalid {0}: {1}")]
    InvalidArgument(&'static str, String),
}

/// Connect to the admin database without loading the Shopify settings.
///
/// Reads `ADMIN_DATABASE_URL`, falling back to `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("ADMIN_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingEnvVar("ADMIN_DATABASE_URL"))?;

    tracing::info!("Connecting to admin database...");
    Ok(db::create_pool(&SecretString::from(database_url)).await?)
}
