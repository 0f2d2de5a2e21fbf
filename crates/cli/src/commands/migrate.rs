//! Database migration command.
//!
//! Applies `crates/admin/migrations/` (schema `wholesale`). The admin server
//! never runs migrations itself.

use super::{CliError, connect};

/// Run admin database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}
