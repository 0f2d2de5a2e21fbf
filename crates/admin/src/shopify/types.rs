//! Domain types for Shopify customer provisioning.
//!
//! These are clean Rust types decoupled from the GraphQL wire shapes in
//! `admin::queries`. Input types serialize straight into the mutation
//! variables, so their field names follow the Admin API (`camelCase`).

use serde::{Deserialize, Serialize};

/// The tag every approved wholesale customer carries.
pub const WHOLESALE_TAG: &str = "wholesale";

/// Minimal view of an existing Shopify customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    /// Global ID (e.g., `gid://shopify/Customer/123`).
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields sent with `customerCreate` / `customerUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub tags: Vec<String>,
    /// Omitted entirely when the inquiry carried no address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<MailingAddressInput>>,
}

/// Address input for customer mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingAddressInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Province/state code (e.g., `ON`, `CA`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_input_skips_absent_fields() {
        let input = CustomerInput {
            email: Some("a@x.com".to_string()),
            tags: vec![WHOLESALE_TAG.to_string()],
            ..CustomerInput::default()
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "email": "a@x.com", "tags": ["wholesale"] })
        );
    }

    #[test]
    fn test_address_uses_admin_api_names() {
        let address = MailingAddressInput {
            province_code: Some("ON".to_string()),
            country_code: Some("CA".to_string()),
            zip: Some("K1A 0B1".to_string()),
            ..MailingAddressInput::default()
        };
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["provinceCode"], "ON");
        assert_eq!(json["countryCode"], "CA");
        assert_eq!(json["zip"], "K1A 0B1");
        assert!(json.get("city").is_none());
    }
}
