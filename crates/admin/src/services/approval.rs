//! Wholesale inquiry approval workflow.
//!
//! Approving an inquiry provisions a Shopify customer for the contact and
//! then flips the local record to `APPROVED`:
//!
//! 1. look up a remote customer by the inquiry's email
//! 2. update that customer, or create one when none matched
//! 3. mark the inquiry approved
//!
//! Remote failures leave the inquiry `PENDING`. A local write failure after a
//! successful remote write is not rolled back; it is logged and reported as
//! an unknown error so the operator can retry.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use wholesale_bridge_core::{Email, InquiryId, InquiryStatus};

use crate::db::{InquiryStore, RepositoryError};
use crate::models::{WholesaleInquiry, present};
use crate::shopify::{
    AdminShopifyError, CustomerDirectory, CustomerInput, MailingAddressInput, WHOLESALE_TAG,
};

/// Whether approvals talk to Shopify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalMode {
    /// Find-or-create the remote customer, then mark approved.
    #[default]
    Live,
    /// Skip every remote call and mark approved directly. UI-flow testing only.
    TestBypass,
}

/// What happened to the remote customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Created,
    Updated,
    /// Test mode; no remote call was made.
    Skipped,
}

/// Successful approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalOutcome {
    pub inquiry_id: InquiryId,
    /// Remote customer ID; `None` in test mode.
    pub customer_id: Option<String>,
    pub action: SyncAction,
}

/// Reasons an approval can fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApprovalError {
    /// The request carried no usable inquiry ID.
    #[error("Missing inquiry id")]
    MissingId,

    /// No inquiry with this ID.
    #[error("Inquiry not found")]
    NotFound(InquiryId),

    /// The inquiry was already approved; nothing was changed.
    #[error("This inquiry is already approved")]
    AlreadyApproved(InquiryId),

    /// Shopify returned a top-level GraphQL error.
    #[error("{0}")]
    Remote(String),

    /// Shopify rejected a field value.
    #[error("{}", format_validation(.field, .message))]
    Validation { field: String, message: String },

    /// Transport, decoding or database failure.
    #[error("{0}")]
    Unknown(String),
}

fn format_validation(field: &str, message: &str) -> String {
    if field.is_empty() {
        message.to_string()
    } else {
        format!("{field}: {message}")
    }
}

impl From<AdminShopifyError> for ApprovalError {
    fn from(err: AdminShopifyError) -> Self {
        match err {
            AdminShopifyError::GraphQL(errors) => errors.into_iter().next().map_or_else(
                || Self::Remote("Unknown GraphQL error".to_string()),
                |e| Self::Remote(e.message),
            ),
            AdminShopifyError::UserErrors(errors) => errors.into_iter().next().map_or_else(
                || Self::Unknown("Empty userErrors".to_string()),
                |e| Self::Validation {
                    field: e.field_path(),
                    message: e.message,
                },
            ),
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApprovalError {
    fn from(err: RepositoryError) -> Self {
        Self::Unknown(err.to_string())
    }
}

/// Build the customer fields for an inquiry.
///
/// `email` is the inquiry's validated address. `existing_tags` are the remote customer's current tags on update; the
/// wholesale tag is added to them rather than replacing them.
#[must_use]
pub fn customer_input_for(
    inquiry: &WholesaleInquiry,
    email: &Email,
    existing_tags: &[String],
) -> CustomerInput {
    let mut tags: Vec<String> = existing_tags.to_vec();
    if !tags.iter().any(|t| t.eq_ignore_ascii_case(WHOLESALE_TAG)) {
        tags.push(WHOLESALE_TAG.to_string());
    }

    let note = inquiry.customer_note();

    CustomerInput {
        email: Some(email.as_str().to_string()),
        first_name: present(Some(inquiry.first_name.as_str())).map(String::from),
        last_name: present(Some(inquiry.last_name.as_str())).map(String::from),
        phone: present(inquiry.phone_number.as_deref()).map(String::from),
        note: (!note.is_empty()).then_some(note),
        tags,
        addresses: mailing_address(inquiry).map(|address| vec![address]),
    }
}

fn mailing_address(inquiry: &WholesaleInquiry) -> Option<MailingAddressInput> {
    let address = &inquiry.address;
    if !address.is_present() {
        return None;
    }

    let owned = |value: Option<&str>| present(value).map(String::from);

    Some(MailingAddressInput {
        address1: owned(address.address1.as_deref()),
        address2: owned(address.address2.as_deref()),
        city: owned(address.city.as_deref()),
        province_code: province_code(address.province.as_deref()),
        zip: owned(address.postal_code.as_deref()),
        country_code: country_code(address.country.as_deref()),
        company: owned(Some(inquiry.company_name.as_str())),
        first_name: owned(Some(inquiry.first_name.as_str())),
        last_name: owned(Some(inquiry.last_name.as_str())),
        phone: owned(inquiry.phone_number.as_deref()),
    })
}

/// ISO 3166-1 alpha-2 code, or `None` for free-text country names.
fn country_code(country: Option<&str>) -> Option<String> {
    present(country)
        .filter(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase)
}

/// Subdivision code (`ON`, `NSW`), or `None` for free-text province names.
fn province_code(province: Option<&str>) -> Option<String> {
    present(province)
        .filter(|p| (2..=3).contains(&p.len()) && p.chars().all(|ch| ch.is_ascii_alphanumeric()))
        .map(str::to_ascii_uppercase)
}

/// Runs listings and approvals against the injected capabilities.
#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn InquiryStore>,
    customers: Arc<dyn CustomerDirectory>,
    mode: ApprovalMode,
}

impl ApprovalService {
    #[must_use]
    pub fn new(
        store: Arc<dyn InquiryStore>,
        customers: Arc<dyn CustomerDirectory>,
        mode: ApprovalMode,
    ) -> Self {
        Self {
            store,
            customers,
            mode,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ApprovalMode {
        self.mode
    }

    /// All inquiries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn list_inquiries(&self) -> Result<Vec<WholesaleInquiry>, RepositoryError> {
        self.store.list_newest_first().await
    }

    /// Approve a pending inquiry.
    ///
    /// # Errors
    ///
    /// See [`ApprovalError`]. Only a successful return changes the inquiry's
    /// status.
    #[instrument(skip(self), fields(inquiry_id = %id, mode = ?self.mode))]
    pub async fn approve(&self, id: InquiryId) -> Result<ApprovalOutcome, ApprovalError> {
        let inquiry = self.store.get(id).await?.ok_or_else(|| {
            tracing::warn!("Approval requested for unknown inquiry");
            ApprovalError::NotFound(id)
        })?;

        if !inquiry.status.can_transition_to(InquiryStatus::Approved) {
            tracing::warn!(status = %inquiry.status, "Inquiry already approved");
            return Err(ApprovalError::AlreadyApproved(id));
        }

        let (customer_id, action) = match self.mode {
            ApprovalMode::Live => {
                let (customer_id, action) = self.sync_customer(&inquiry).await?;
                (Some(customer_id), action)
            }
            ApprovalMode::TestBypass => {
                tracing::warn!("Test mode: skipping Shopify customer sync");
                (None, SyncAction::Skipped)
            }
        };

        if let Err(e) = self.store.mark_approved(id).await {
            tracing::error!(
                error = %e,
                customer_id = ?customer_id,
                "Customer synced but inquiry could not be marked approved"
            );
            return Err(e.into());
        }

        tracing::info!(customer_id = ?customer_id, action = ?action, "Inquiry approved");

        Ok(ApprovalOutcome {
            inquiry_id: id,
            customer_id,
            action,
        })
    }

    async fn sync_customer(
        &self,
        inquiry: &WholesaleInquiry,
    ) -> Result<(String, SyncAction), ApprovalError> {
        let email = inquiry.contact_email().map_err(|e| {
            tracing::warn!(
                email = %inquiry.email,
                error = %e,
                "Inquiry email is not a valid address"
            );
            ApprovalError::Validation {
                field: "email".to_string(),
                message: e.to_string(),
            }
        })?;

        let existing = self
            .customers
            .find_by_email(&email)
            .await
            .map_err(log_remote_failure)?;

        let result = match existing {
            Some(customer) => {
                let input = customer_input_for(inquiry, &email, &customer.tags);
                self.customers
                    .update(&customer.id, &input)
                    .await
                    .map(|id| (id, SyncAction::Updated))
            }
            None => {
                let input = customer_input_for(inquiry, &email, &[]);
                self.customers
                    .create(&input)
                    .await
                    .map(|id| (id, SyncAction::Created))
            }
        };

        result.map_err(log_remote_failure)
    }
}

fn log_remote_failure(err: AdminShopifyError) -> ApprovalError {
    tracing::error!(error = %err, "Shopify customer sync failed");
    err.into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{InquiryAddress, InquiryLinks};
    use crate::shopify::{CustomerSummary, GraphQLError, UserError};
    use crate::testing::{DirectoryCall, MemoryInquiryStore, RecordingCustomerDirectory};

    fn inquiry(id: i32, email: &str, status: InquiryStatus) -> WholesaleInquiry {
        WholesaleInquiry {
            id: InquiryId::new(id),
            company_name: "Acme Goods".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone_number: None,
            address: InquiryAddress::default(),
            links: InquiryLinks::default(),
            status,
            created_at: Utc::now(),
        }
    }

    fn service(
        store: &Arc<MemoryInquiryStore>,
        directory: &Arc<RecordingCustomerDirectory>,
        mode: ApprovalMode,
    ) -> ApprovalService {
        ApprovalService::new(store.clone(), directory.clone(), mode)
    }

    async fn status_of(store: &MemoryInquiryStore, id: i32) -> InquiryStatus {
        store.get(InquiryId::new(id)).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_pending_without_remote_match_creates_customer() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            1,
            "a@x.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let outcome = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(1))
            .await
            .unwrap();

        assert_eq!(outcome.action, SyncAction::Created);
        assert!(outcome.customer_id.is_some());
        assert_eq!(status_of(&store, 1).await, InquiryStatus::Approved);

        let calls = directory.calls().await;
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], DirectoryCall::Find(email) if email == "a@x.com"));
        match &calls[1] {
            DirectoryCall::Create(input) => {
                assert_eq!(input.email.as_deref(), Some("a@x.com"));
                assert_eq!(input.tags, vec!["wholesale"]);
                assert_eq!(input.note.as_deref(), Some("Company: Acme Goods"));
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_existing_remote_customer_is_updated_never_created() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            3,
            "b@x.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        directory
            .add_customer(CustomerSummary {
                id: "gid://shopify/Customer/42".to_string(),
                email: Some("B@x.com".to_string()),
                first_name: None,
                last_name: None,
                tags: vec!["vip".to_string()],
            })
            .await;

        let outcome = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(3))
            .await
            .unwrap();

        assert_eq!(outcome.action, SyncAction::Updated);
        assert_eq!(outcome.customer_id.as_deref(), Some("gid://shopify/Customer/42"));

        let calls = directory.calls().await;
        assert!(!calls.iter().any(|c| matches!(c, DirectoryCall::Create(_))));
        match &calls[1] {
            DirectoryCall::Update(id, input) => {
                assert_eq!(id, "gid://shopify/Customer/42");
                assert_eq!(input.tags, vec!["vip", "wholesale"]);
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_already_approved_has_no_side_effects() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            2,
            "c@x.com",
            InquiryStatus::Approved,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(2))
            .await
            .unwrap_err();

        assert_eq!(err, ApprovalError::AlreadyApproved(InquiryId::new(2)));
        assert_eq!(err.to_string(), "This inquiry is already approved");
        assert!(directory.calls().await.is_empty());
        assert_eq!(store.approval_writes(), 0);
        assert_eq!(status_of(&store, 2).await, InquiryStatus::Approved);
    }

    #[tokio::test]
    async fn test_unknown_inquiry_is_not_found() {
        let store = Arc::new(MemoryInquiryStore::default());
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(99))
            .await
            .unwrap_err();

        assert_eq!(err, ApprovalError::NotFound(InquiryId::new(99)));
        assert_eq!(err.to_string(), "Inquiry not found");
        assert!(directory.calls().await.is_empty());
        assert_eq!(store.approval_writes(), 0);
    }

    #[tokio::test]
    async fn test_validation_error_keeps_inquiry_pending() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            4,
            "d@x.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        directory
            .fail_next_write(AdminShopifyError::UserErrors(vec![
                UserError {
                    field: vec!["input".to_string(), "phone".to_string()],
                    message: "Phone is invalid".to_string(),
                },
                UserError {
                    field: vec!["input".to_string(), "email".to_string()],
                    message: "Email is invalid".to_string(),
                },
            ]))
            .await;

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(4))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "input.phone: Phone is invalid");
        assert_eq!(status_of(&store, 4).await, InquiryStatus::Pending);
        assert_eq!(store.approval_writes(), 0);
    }

    #[tokio::test]
    async fn test_graphql_error_surfaces_first_message() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            5,
            "e@x.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        directory
            .fail_next_find(AdminShopifyError::GraphQL(vec![
                GraphQLError::message("Access denied for customers field."),
                GraphQLError::message("second"),
            ]))
            .await;

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(5))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApprovalError::Remote("Access denied for customers field.".to_string())
        );
        assert_eq!(directory.calls().await.len(), 1);
        assert_eq!(status_of(&store, 5).await, InquiryStatus::Pending);
    }

    #[tokio::test]
    async fn test_transport_failure_is_unknown() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            6,
            "f@x.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        directory.fail_next_find(AdminShopifyError::RateLimited(5)).await;

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(6))
            .await
            .unwrap_err();

        assert!(matches!(err, ApprovalError::Unknown(_)));
        assert_eq!(status_of(&store, 6).await, InquiryStatus::Pending);
    }

    #[tokio::test]
    async fn test_local_write_failure_after_remote_success() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            7,
            "g@x.com",
            InquiryStatus::Pending,
        )]));
        store.fail_writes(true).await;
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(7))
            .await
            .unwrap_err();

        assert!(matches!(err, ApprovalError::Unknown(_)));
        // The remote customer exists even though the inquiry stays pending.
        assert_eq!(directory.calls().await.len(), 2);
        assert_eq!(status_of(&store, 7).await, InquiryStatus::Pending);
    }

    #[tokio::test]
    async fn test_test_mode_skips_remote_calls() {
        let store = Arc::new(MemoryInquiryStore::with(vec![
            inquiry(8, "h@x.com", InquiryStatus::Pending),
            inquiry(9, "i@x.com", InquiryStatus::Approved),
        ]));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        let approvals = service(&store, &directory, ApprovalMode::TestBypass);

        let outcome = approvals.approve(InquiryId::new(8)).await.unwrap();
        assert_eq!(outcome.action, SyncAction::Skipped);
        assert_eq!(outcome.customer_id, None);
        assert_eq!(status_of(&store, 8).await, InquiryStatus::Approved);

        let err = approvals.approve(InquiryId::new(9)).await.unwrap_err();
        assert!(matches!(err, ApprovalError::AlreadyApproved(_)));
        assert!(directory.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let mut older = inquiry(1, "old@x.com", InquiryStatus::Pending);
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = inquiry(2, "new@x.com", InquiryStatus::Pending);
        let store = Arc::new(MemoryInquiryStore::with(vec![older, newer]));
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let listed = service(&store, &directory, ApprovalMode::Live)
            .list_inquiries()
            .await
            .unwrap();
        let ids: Vec<i32> = listed.iter().map(|i| i.id.as_i32()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_malformed_email_is_rejected_before_remote_calls() {
        let store = Arc::new(MemoryInquiryStore::with(vec![inquiry(
            4,
            "Jane Doe@shop.com",
            InquiryStatus::Pending,
        )]));
        let directory = Arc::new(RecordingCustomerDirectory::new());

        let err = service(&store, &directory, ApprovalMode::Live)
            .approve(InquiryId::new(4))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApprovalError::Validation {
                field: "email".to_string(),
                message: "email cannot contain whitespace".to_string(),
            }
        );
        assert!(directory.calls().await.is_empty());
        assert_eq!(store.approval_writes(), 0);
        assert_eq!(status_of(&store, 4).await, InquiryStatus::Pending);
    }

    #[test]
    fn test_customer_input_with_full_record() {
        let mut record = inquiry(1, "a@x.com", InquiryStatus::Pending);
        record.phone_number = Some(" +1 555 0100 ".to_string());
        record.links.website_url = Some("https://acme.test".to_string());
        record.address = InquiryAddress {
            address1: Some("1 Main St".to_string()),
            address2: None,
            city: Some("Toronto".to_string()),
            province: Some("on".to_string()),
            postal_code: Some("M5V 2T6".to_string()),
            country: Some("ca".to_string()),
        };

        let input = customer_input_for(&record, &record.contact_email().unwrap(), &[]);
        assert_eq!(input.first_name.as_deref(), Some("Ada"));
        assert_eq!(input.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(
            input.note.as_deref(),
            Some("Company: Acme Goods\nPhone: +1 555 0100\nWebsite: https://acme.test")
        );

        let addresses = input.addresses.unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].country_code.as_deref(), Some("CA"));
        assert_eq!(addresses[0].province_code.as_deref(), Some("ON"));
        assert_eq!(addresses[0].zip.as_deref(), Some("M5V 2T6"));
        assert_eq!(addresses[0].company.as_deref(), Some("Acme Goods"));
    }

    #[test]
    fn test_customer_input_without_address() {
        let record = inquiry(1, "a@x.com", InquiryStatus::Pending);
        let input = customer_input_for(&record, &record.contact_email().unwrap(), &[]);
        assert!(input.addresses.is_none());
        assert!(input.phone.is_none());
    }

    #[test]
    fn test_free_text_country_is_not_sent_as_code() {
        let mut record = inquiry(1, "a@x.com", InquiryStatus::Pending);
        record.address.country = Some("United States".to_string());
        record.address.province = Some("California".to_string());

        let email = record.contact_email().unwrap();
        let addresses = customer_input_for(&record, &email, &[]).addresses.unwrap();
        assert!(addresses[0].country_code.is_none());
        assert!(addresses[0].province_code.is_none());
    }

    #[test]
    fn test_wholesale_tag_is_not_duplicated() {
        let record = inquiry(1, "a@x.com", InquiryStatus::Pending);
        let email = record.contact_email().unwrap();
        let input = customer_input_for(&record, &email, &["Wholesale".to_string()]);
        assert_eq!(input.tags, vec!["Wholesale"]);
    }

    #[test]
    fn test_validation_without_field_path() {
        let err = ApprovalError::from(AdminShopifyError::UserErrors(vec![UserError {
            field: vec![],
            message: "Email has already been taken".to_string(),
        }]));
        assert_eq!(err.to_string(), "Email has already been taken");
    }
}
