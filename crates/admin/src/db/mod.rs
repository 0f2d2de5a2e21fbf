//! Database operations for the admin `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `wholesale.wholesale_inquiry` - Wholesale inquiries and their review status
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p wholesale-bridge-cli -- migrate
//! ```

pub mod inquiries;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use wholesale_bridge_core::InquiryId;

use crate::models::{NewInquiry, WholesaleInquiry};

pub use inquiries::PgInquiryStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Persistence capability for wholesale inquiries.
///
/// The approval workflow only sees this trait, so it can run against
/// `PostgreSQL` in production and an in-memory store in tests.
#[async_trait]
pub trait InquiryStore: Send + Sync {
    /// All inquiries, most recently created first.
    async fn list_newest_first(&self) -> Result<Vec<WholesaleInquiry>, RepositoryError>;

    /// A single inquiry, if it exists.
    async fn get(&self, id: InquiryId) -> Result<Option<WholesaleInquiry>, RepositoryError>;

    /// Set the inquiry's status to `APPROVED`.
    ///
    /// Unconditional on the current status; returns `NotFound` when no row
    /// matched.
    async fn mark_approved(&self, id: InquiryId) -> Result<(), RepositoryError>;

    /// Insert a new `PENDING` inquiry.
    async fn insert(&self, inquiry: NewInquiry) -> Result<WholesaleInquiry, RepositoryError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
