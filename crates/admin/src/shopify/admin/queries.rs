//! GraphQL operation definitions for the Shopify Admin API.
//!
//! Each operation implements `graphql_client::GraphQLQuery` by hand: the
//! document is a `&'static str` and the variables/response shapes are
//! plain serde types covering only the fields the approval flow reads.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use crate::shopify::types::CustomerInput;

/// `userErrors` entry shared by customer mutations.
#[derive(Debug, Clone, Deserialize)]
pub struct UserErrorNode {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Customer ID returned in mutation payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerIdNode {
    pub id: String,
}

// =============================================================================
// Customer lookup
// =============================================================================

pub struct FindCustomerByEmail;

pub mod find_customer_by_email {
    use super::{Deserialize, Serialize};

    pub const OPERATION_NAME: &str = "FindCustomerByEmail";
    pub const QUERY: &str = r"
query FindCustomerByEmail($query: String!) {
  customers(first: 5, query: $query) {
    edges {
      node {
        id
        email
        firstName
        lastName
        tags
      }
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub query: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub customers: Customers,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Customers {
        pub edges: Vec<Edge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Edge {
        pub node: Node,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Node {
        pub id: String,
        pub email: Option<String>,
        pub first_name: Option<String>,
        pub last_name: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
    }
}

impl GraphQLQuery for FindCustomerByEmail {
    type Variables = find_customer_by_email::Variables;
    type ResponseData = find_customer_by_email::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: find_customer_by_email::QUERY,
            operation_name: find_customer_by_email::OPERATION_NAME,
        }
    }
}

// =============================================================================
// Customer mutations
// =============================================================================

pub struct CustomerCreate;

pub mod customer_create {
    use super::{CustomerIdNode, CustomerInput, Deserialize, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "CustomerCreate";
    pub const QUERY: &str = r"
mutation CustomerCreate($input: CustomerInput!) {
  customerCreate(input: $input) {
    customer {
      id
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CustomerInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_create: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer: Option<CustomerIdNode>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }
}

impl GraphQLQuery for CustomerCreate {
    type Variables = customer_create::Variables;
    type ResponseData = customer_create::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: customer_create::QUERY,
            operation_name: customer_create::OPERATION_NAME,
        }
    }
}

pub struct CustomerUpdate;

pub mod customer_update {
    use serde::Serializer;

    use super::{CustomerIdNode, CustomerInput, Deserialize, Serialize, UserErrorNode};

    pub const OPERATION_NAME: &str = "CustomerUpdate";
    pub const QUERY: &str = r"
mutation CustomerUpdate($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
    }
    userErrors {
      field
      message
    }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: UpdateInput,
    }

    /// `CustomerInput` plus the target customer's `id`.
    #[derive(Debug, Clone)]
    pub struct UpdateInput {
        pub id: String,
        pub fields: CustomerInput,
    }

    impl Serialize for UpdateInput {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            #[derive(Serialize)]
            struct Flat<'a> {
                id: &'a str,
                #[serde(flatten)]
                fields: &'a CustomerInput,
            }

            Flat {
                id: &self.id,
                fields: &self.fields,
            }
            .serialize(serializer)
        }
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub customer_update: Option<Payload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub customer: Option<CustomerIdNode>,
        #[serde(default)]
        pub user_errors: Vec<UserErrorNode>,
    }
}

impl GraphQLQuery for CustomerUpdate {
    type Variables = customer_update::Variables;
    type ResponseData = customer_update::ResponseData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: customer_update::QUERY,
            operation_name: customer_update::OPERATION_NAME,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_body_shape() {
        let body = FindCustomerByEmail::build_query(find_customer_by_email::Variables {
            query: "email:\"a@x.com\"".to_string(),
        });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["operationName"], "FindCustomerByEmail");
        assert_eq!(json["variables"]["query"], "email:\"a@x.com\"");
        assert!(json["query"].as_str().unwrap().contains("customers(first: 5"));
    }

    #[test]
    fn test_update_input_flattens_id() {
        let variables = customer_update::Variables {
            input: customer_update::UpdateInput {
                id: "gid://shopify/Customer/7".to_string(),
                fields: CustomerInput {
                    note: Some("Company: Acme".to_string()),
                    tags: vec!["vip".to_string(), "wholesale".to_string()],
                    ..CustomerInput::default()
                },
            },
        };
        let json = serde_json::to_value(&variables).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input": {
                    "id": "gid://shopify/Customer/7",
                    "note": "Company: Acme",
                    "tags": ["vip", "wholesale"],
                }
            })
        );
    }

    #[test]
    fn test_mutation_payload_parses_user_errors() {
        let json = serde_json::json!({
            "customerCreate": {
                "customer": null,
                "userErrors": [{ "field": ["input", "phone"], "message": "Phone is invalid" }]
            }
        });
        let data: customer_create::ResponseData = serde_json::from_value(json).unwrap();
        let payload = data.customer_create.unwrap();
        assert!(payload.customer.is_none());
        assert_eq!(payload.user_errors[0].message, "Phone is invalid");
    }
}
