//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::InquiryStore;
use crate::services::ApprovalService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach the database and Shopify only
/// through the injected capabilities, so tests can build a state over fakes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: Arc<dyn InquiryStore>,
    approvals: ApprovalService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AdminConfig, store: Arc<dyn InquiryStore>, approvals: ApprovalService) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                approvals,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get the inquiry store (used directly by readiness checks).
    #[must_use]
    pub fn store(&self) -> &dyn InquiryStore {
        self.inner.store.as_ref()
    }

    /// Get the approval workflow.
    #[must_use]
    pub fn approvals(&self) -> &ApprovalService {
        &self.inner.approvals
    }
}
