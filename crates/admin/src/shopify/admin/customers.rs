//! Customer lookup and provisioning for the Admin API.

use async_trait::async_trait;
use graphql_client::GraphQLQuery;
use tracing::instrument;

use wholesale_bridge_core::Email;

use super::{
    AdminClient, AdminShopifyError, GraphQLError, check_user_errors,
    queries::{
        CustomerCreate, CustomerUpdate, FindCustomerByEmail, customer_create, customer_update,
        find_customer_by_email,
    },
};
use crate::shopify::{CustomerDirectory, CustomerInput, CustomerSummary};

/// Build the customer search string for an exact email match.
///
/// The address is quoted so `+`, `-` and `.` are not treated as search
/// syntax.
fn email_search_query(email: &Email) -> String {
    let escaped = email.as_str().replace('\\', "\\\\").replace('"', "\\\"");
    format!("email:\"{escaped}\"")
}

/// Pick the first node whose email matches exactly, ignoring case.
///
/// Shopify search is fuzzy, so a returned node is not trusted on its own.
fn matching_customer(
    email: &Email,
    data: find_customer_by_email::ResponseData,
) -> Option<CustomerSummary> {
    data.customers
        .edges
        .into_iter()
        .map(|edge| edge.node)
        .find(|node| {
            node.email
                .as_deref()
                .is_some_and(|e| e.trim().eq_ignore_ascii_case(email.as_str()))
        })
        .map(|node| CustomerSummary {
            id: node.id,
            email: node.email,
            first_name: node.first_name,
            last_name: node.last_name,
            tags: node.tags,
        })
}

fn missing_customer(operation: &str) -> AdminShopifyError {
    AdminShopifyError::GraphQL(vec![GraphQLError::message(format!(
        "No customer returned from {operation}"
    ))])
}

#[async_trait]
impl CustomerDirectory for AdminClient {
    #[instrument(skip(self), fields(email = %email))]
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerSummary>, AdminShopifyError> {
        let variables = find_customer_by_email::Variables {
            query: email_search_query(email),
        };

        let response: <FindCustomerByEmail as GraphQLQuery>::ResponseData =
            self.execute::<FindCustomerByEmail>(variables).await?;

        Ok(matching_customer(email, response))
    }

    #[instrument(skip(self, input))]
    async fn create(&self, input: &CustomerInput) -> Result<String, AdminShopifyError> {
        let variables = customer_create::Variables {
            input: input.clone(),
        };

        let response: <CustomerCreate as GraphQLQuery>::ResponseData =
            self.execute::<CustomerCreate>(variables).await?;

        let payload = response
            .customer_create
            .ok_or_else(|| missing_customer("create"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .customer
            .map(|customer| customer.id)
            .ok_or_else(|| missing_customer("create"))
    }

    #[instrument(skip(self, input), fields(customer_id = %id))]
    async fn update(&self, id: &str, input: &CustomerInput) -> Result<String, AdminShopifyError> {
        let variables = customer_update::Variables {
            input: customer_update::UpdateInput {
                id: id.to_string(),
                fields: input.clone(),
            },
        };

        let response: <CustomerUpdate as GraphQLQuery>::ResponseData =
            self.execute::<CustomerUpdate>(variables).await?;

        let payload = response
            .customer_update
            .ok_or_else(|| missing_customer("update"))?;
        check_user_errors(payload.user_errors)?;

        payload
            .customer
            .map(|customer| customer.id)
            .ok_or_else(|| missing_customer("update"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(nodes: serde_json::Value) -> find_customer_by_email::ResponseData {
        serde_json::from_value(serde_json::json!({ "customers": { "edges": nodes } })).unwrap()
    }

    #[test]
    fn test_email_search_query_is_quoted() {
        let email = Email::parse("first.last+tag@shop.test").unwrap();
        assert_eq!(email_search_query(&email), "email:\"first.last+tag@shop.test\"");
    }

    #[test]
    fn test_matching_ignores_case() {
        let email = Email::parse("a@x.com").unwrap();
        let data = response(serde_json::json!([
            { "node": { "id": "gid://shopify/Customer/9", "email": "A@X.com", "tags": [] } }
        ]));
        let found = matching_customer(&email, data).unwrap();
        assert_eq!(found.id, "gid://shopify/Customer/9");
    }

    #[test]
    fn test_fuzzy_hit_is_not_a_match() {
        let email = Email::parse("a@x.com").unwrap();
        let data = response(serde_json::json!([
            { "node": { "id": "gid://shopify/Customer/9", "email": "aa@x.com", "tags": [] } }
        ]));
        assert!(matching_customer(&email, data).is_none());
    }

    #[test]
    fn test_exact_match_behind_fuzzy_hits() {
        let email = Email::parse("a@x.com").unwrap();
        let data = response(serde_json::json!([
            { "node": { "id": "gid://shopify/Customer/1", "email": "aa@x.com", "tags": [] } },
            { "node": { "id": "gid://shopify/Customer/2", "email": null, "tags": [] } },
            { "node": { "id": "gid://shopify/Customer/3", "email": "a@x.com", "tags": ["vip"] } }
        ]));
        let found = matching_customer(&email, data).unwrap();
        assert_eq!(found.id, "gid://shopify/Customer/3");
        assert_eq!(found.tags, vec!["vip"]);
    }

    #[test]
    fn test_empty_result() {
        let email = Email::parse("a@x.com").unwrap();
        assert!(matching_customer(&email, response(serde_json::json!([]))).is_none());
    }
}
