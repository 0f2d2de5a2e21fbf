//! Wholesale inquiry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wholesale_bridge_core::{Email, EmailError, InquiryId, InquiryStatus};

/// Optional postal address supplied with an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryAddress {
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl InquiryAddress {
    /// Whether any address field carries a non-blank value.
    #[must_use]
    pub fn is_present(&self) -> bool {
        [
            &self.address1,
            &self.address2,
            &self.city,
            &self.province,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .any(|field| present(field.as_deref()).is_some())
    }
}

/// Optional website, social and marketplace links supplied with an inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryLinks {
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub marketplace_url: Option<String>,
}

/// A wholesale-partnership request awaiting (or past) review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WholesaleInquiry {
    pub id: InquiryId,
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    /// Email as stored. Rows are written by the storefront form, so this is
    /// not guaranteed to be a valid address; see [`Self::contact_email`].
    pub email: String,
    pub phone_number: Option<String>,
    pub address: InquiryAddress,
    pub links: InquiryLinks,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

impl WholesaleInquiry {
    /// Display name of the contact person ("First Last").
    #[must_use]
    pub fn contact_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// The stored email, validated and normalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value is not a usable address.
    pub fn contact_email(&self) -> Result<Email, EmailError> {
        Email::parse(&self.email)
    }

    /// Free-text note describing the inquiry for the remote customer record.
    ///
    /// One `Label: value` line per present field, in a fixed order: company,
    /// phone, website, Instagram, Facebook, TikTok, marketplace. Blank fields
    /// are skipped entirely.
    #[must_use]
    pub fn customer_note(&self) -> String {
        let entries = [
            ("Company", Some(self.company_name.as_str())),
            ("Phone", self.phone_number.as_deref()),
            ("Website", self.links.website_url.as_deref()),
            ("Instagram", self.links.instagram_url.as_deref()),
            ("Facebook", self.links.facebook_url.as_deref()),
            ("TikTok", self.links.tiktok_url.as_deref()),
            ("Marketplace", self.links.marketplace_url.as_deref()),
        ];

        entries
            .into_iter()
            .filter_map(|(label, value)| present(value).map(|v| format!("{label}: {v}")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Fields for inserting a new inquiry. Status always starts as `PENDING`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub company_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: InquiryAddress,
    #[serde(default)]
    pub links: InquiryLinks,
}

/// Returns the trimmed value when it is non-blank.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
