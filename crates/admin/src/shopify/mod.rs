//! Shopify Admin API client for customer provisioning.
//!
//! # Security
//!
//! The Admin API access token can create and modify customers. Keep the
//! service on private infrastructure and never log the token.
//!
//! # Architecture
//!
//! - `graphql_client::GraphQLQuery` implementations for the three operations
//!   the approval workflow needs (find by email, create, update)
//! - Direct API calls to Shopify via `reqwest` (no local sync or caching)
//! - [`CustomerDirectory`] is the capability the workflow depends on, so tests
//!   can substitute a recording fake
//!
//! # Example
//!
//! ```rust,ignore
//! use wholesale_bridge_admin::shopify::{AdminClient, CustomerDirectory};
//!
//! let client = AdminClient::new(&config.shopify)?;
//! if let Some(existing) = client.find_by_email(&email).await? {
//!     client.update(&existing.id, &input).await?;
//! } else {
//!     client.create(&input).await?;
//! }
//! ```

mod admin;
pub mod types;

pub use admin::AdminClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use wholesale_bridge_core::Email;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL response carried a top-level `errors` envelope.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Mutation was accepted but rejected field values.
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: vec![],
        }
    }
}

/// A field-level validation error from a mutation's `userErrors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// Path to the offending input field (e.g., `["input", "phone"]`).
    pub field: Vec<String>,
    /// Human-readable message.
    pub message: String,
}

impl UserError {
    /// Dotted field path, or an empty string when Shopify gave none.
    #[must_use]
    pub fn field_path(&self) -> String {
        self.field.join(".")
    }
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field_path(), self.message)
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Remote customer lookup and provisioning.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Find the customer whose email matches exactly (case-insensitive).
    async fn find_by_email(&self, email: &Email)
    -> Result<Option<CustomerSummary>, AdminShopifyError>;

    /// Create a customer; returns the new customer ID.
    async fn create(&self, input: &CustomerInput) -> Result<String, AdminShopifyError>;

    /// Update an existing customer; returns its ID.
    async fn update(&self, id: &str, input: &CustomerInput) -> Result<String, AdminShopifyError>;
}
