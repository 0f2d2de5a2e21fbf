//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a long-lived Admin API access token sent in the
//! `X-Shopify-Access-Token` header.

mod customers;
pub mod queries;

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, UserError};
use queries::UserErrorNode;

/// Retry delay reported when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Security
///
/// The access token grants write access to customers. Only deploy on
/// private infrastructure.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    endpoint: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g., TLS
    /// backend initialization failure).
    pub fn new(config: &ShopifyAdminConfig) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("wholesale-bridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                store: config.store.clone(),
                endpoint: config.graphql_endpoint(),
                access_token: config.access_token.clone(),
            }),
        })
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// Execute a GraphQL query or mutation.
    #[instrument(skip(self, variables), fields(store = %self.inner.store))]
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        check_status(status, retry_after)?;

        let bytes = response.bytes().await?;
        parse_response::<Q::ResponseData>(&bytes)
    }
}

/// Map transport-level failures that carry no GraphQL body.
fn check_status(status: StatusCode, retry_after: Option<u64>) -> Result<(), AdminShopifyError> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(AdminShopifyError::RateLimited(
            retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        )),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AdminShopifyError::Unauthorized(
            "Invalid or expired access token".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Decode a GraphQL envelope. Any entry in `errors` wins over `data`.
fn parse_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AdminShopifyError> {
    let graphql_response: GraphQLResponse<T> = serde_json::from_slice(bytes)?;

    if let Some(errors) = graphql_response.errors
        && !errors.is_empty()
    {
        let converted_errors: Vec<GraphQLError> = errors
            .into_iter()
            .map(|e| GraphQLError {
                message: e.message,
                path: e.path,
            })
            .collect();
        return Err(AdminShopifyError::GraphQL(converted_errors));
    }

    graphql_response
        .data
        .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::message("No data in response")]))
}

/// Turn a mutation's `userErrors` list into an error when non-empty.
fn check_user_errors(user_errors: Vec<UserErrorNode>) -> Result<(), AdminShopifyError> {
    if user_errors.is_empty() {
        return Ok(());
    }
    Err(AdminShopifyError::UserErrors(
        user_errors
            .into_iter()
            .map(|e| UserError {
                field: e.field.unwrap_or_default(),
                message: e.message,
            })
            .collect(),
    ))
}
