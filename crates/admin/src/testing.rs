//! In-memory fakes for the approval workflow's capabilities.
//!
//! Used by unit tests and the integration-test crate to drive the workflow
//! and the HTTP router without `PostgreSQL` or Shopify.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use wholesale_bridge_core::{Email, InquiryId, InquiryStatus};

use crate::db::{InquiryStore, RepositoryError};
use crate::models::{NewInquiry, WholesaleInquiry};
use crate::shopify::{AdminShopifyError, CustomerDirectory, CustomerInput, CustomerSummary};

// =============================================================================
// Inquiry store
// =============================================================================

/// [`InquiryStore`] backed by a `Vec`.
#[derive(Default)]
pub struct MemoryInquiryStore {
    inquiries: Mutex<Vec<WholesaleInquiry>>,
    approval_writes: AtomicU32,
    fail_writes: Mutex<bool>,
}

impl MemoryInquiryStore {
    /// A store seeded with `inquiries`.
    #[must_use]
    pub fn with(inquiries: Vec<WholesaleInquiry>) -> Self {
        Self {
            inquiries: Mutex::new(inquiries),
            ..Self::default()
        }
    }

    /// Number of `mark_approved` calls that reached the store.
    pub fn approval_writes(&self) -> u32 {
        self.approval_writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent `mark_approved` fail with a database error.
    pub async fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().await = fail;
    }
}

#[async_trait]
impl InquiryStore for MemoryInquiryStore {
    async fn list_newest_first(&self) -> Result<Vec<WholesaleInquiry>, RepositoryError> {
        let mut inquiries = self.inquiries.lock().await.clone();
        inquiries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(inquiries)
    }

    async fn get(&self, id: InquiryId) -> Result<Option<WholesaleInquiry>, RepositoryError> {
        Ok(self
            .inquiries
            .lock()
            .await
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn mark_approved(&self, id: InquiryId) -> Result<(), RepositoryError> {
        self.approval_writes.fetch_add(1, Ordering::SeqCst);
        if *self.fail_writes.lock().await {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut inquiries = self.inquiries.lock().await;
        let inquiry = inquiries
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(RepositoryError::NotFound)?;
        inquiry.status = InquiryStatus::Approved;
        Ok(())
    }

    async fn insert(&self, inquiry: NewInquiry) -> Result<WholesaleInquiry, RepositoryError> {
        let mut inquiries = self.inquiries.lock().await;
        let next_id = inquiries.iter().map(|i| i.id.as_i32()).max().unwrap_or(0) + 1;

        let record = WholesaleInquiry {
            id: InquiryId::new(next_id),
            company_name: inquiry.company_name.trim().to_string(),
            first_name: inquiry.first_name.trim().to_string(),
            last_name: inquiry.last_name.trim().to_string(),
            email: inquiry.email.into_inner(),
            phone_number: inquiry.phone_number,
            address: inquiry.address,
            links: inquiry.links,
            status: InquiryStatus::Pending,
            created_at: Utc::now(),
        };
        inquiries.push(record.clone());
        Ok(record)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

// =============================================================================
// Customer directory
// =============================================================================

/// A call received by [`RecordingCustomerDirectory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    /// `find_by_email` with the searched address.
    Find(String),
    Create(CustomerInput),
    /// `update` with the target customer ID.
    Update(String, CustomerInput),
}

/// [`CustomerDirectory`] that records calls and serves canned customers.
///
/// Created customers are remembered, so a second approval for the same
/// email finds the first one.
#[derive(Default)]
pub struct RecordingCustomerDirectory {
    customers: Mutex<Vec<CustomerSummary>>,
    calls: Mutex<Vec<DirectoryCall>>,
    find_failure: Mutex<Option<AdminShopifyError>>,
    write_failure: Mutex<Option<AdminShopifyError>>,
    next_id: AtomicU32,
}

impl RecordingCustomerDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing remote customer.
    pub async fn add_customer(&self, customer: CustomerSummary) {
        self.customers.lock().await.push(customer);
    }

    /// The next `find_by_email` returns `err`.
    pub async fn fail_next_find(&self, err: AdminShopifyError) {
        *self.find_failure.lock().await = Some(err);
    }

    /// The next `create` or `update` returns `err`.
    pub async fn fail_next_write(&self, err: AdminShopifyError) {
        *self.write_failure.lock().await = Some(err);
    }

    /// All calls received so far, in order.
    pub async fn calls(&self) -> Vec<DirectoryCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: DirectoryCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl CustomerDirectory for RecordingCustomerDirectory {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerSummary>, AdminShopifyError> {
        self.record(DirectoryCall::Find(email.as_str().to_string()))
            .await;
        if let Some(err) = self.find_failure.lock().await.take() {
            return Err(err);
        }

        Ok(self
            .customers
            .lock()
            .await
            .iter()
            .find(|c| {
                c.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email.as_str()))
            })
            .cloned())
    }

    async fn create(&self, input: &CustomerInput) -> Result<String, AdminShopifyError> {
        self.record(DirectoryCall::Create(input.clone())).await;
        if let Some(err) = self.write_failure.lock().await.take() {
            return Err(err);
        }

        let id = format!(
            "gid://shopify/Customer/{}",
            1000 + self.next_id.fetch_add(1, Ordering::SeqCst)
        );
        self.customers.lock().await.push(CustomerSummary {
            id: id.clone(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            tags: input.tags.clone(),
        });
        Ok(id)
    }

    async fn update(&self, id: &str, input: &CustomerInput) -> Result<String, AdminShopifyError> {
        self.record(DirectoryCall::Update(id.to_string(), input.clone()))
            .await;
        if let Some(err) = self.write_failure.lock().await.take() {
            return Err(err);
        }

        if let Some(customer) = self.customers.lock().await.iter_mut().find(|c| c.id == id) {
            customer.tags.clone_from(&input.tags);
        }
        Ok(id.to_string())
    }
}
