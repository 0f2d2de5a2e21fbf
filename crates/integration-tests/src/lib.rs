//! Shared helpers for Wholesale Bridge integration tests.
//!
//! [`TestApp`] wires the real router, approval service and middleware to
//! in-memory fakes so HTTP-level behavior can be checked without
//! `PostgreSQL` or Shopify.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header::CONTENT_TYPE},
};
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use tower::ServiceExt;

use wholesale_bridge_admin::{
    config::{AdminConfig, ShopifyAdminConfig},
    models::{InquiryAddress, InquiryLinks, WholesaleInquiry},
    routes,
    services::{ApprovalMode, ApprovalService},
    state::AppState,
    testing::{MemoryInquiryStore, RecordingCustomerDirectory},
};
use wholesale_bridge_core::{InquiryId, InquiryStatus};

/// Upper bound for buffered response bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration that never reaches a real service.
#[must_use]
pub fn test_config(test_mode: bool) -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/wholesale_test"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyAdminConfig {
            store: "test-store.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_test"),
            request_timeout: Duration::from_secs(5),
        },
        test_mode,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// Build an inquiry record for seeding.
#[must_use]
pub fn inquiry(id: i32, email: &str, status: InquiryStatus) -> WholesaleInquiry {
    inquiry_at(id, email, status, Utc::now())
}

/// Like [`inquiry`], with an explicit creation time.
#[must_use]
pub fn inquiry_at(
    id: i32,
    email: &str,
    status: InquiryStatus,
    created_at: DateTime<Utc>,
) -> WholesaleInquiry {
    WholesaleInquiry {
        id: InquiryId::new(id),
        company_name: format!("Company {id}"),
        first_name: "Test".to_string(),
        last_name: "Buyer".to_string(),
        email: email.to_string(),
        phone_number: None,
        address: InquiryAddress::default(),
        links: InquiryLinks::default(),
        status,
        created_at,
    }
}

/// The router plus handles on the fakes behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryInquiryStore>,
    pub directory: Arc<RecordingCustomerDirectory>,
}

impl TestApp {
    /// An app in live mode seeded with `inquiries`.
    #[must_use]
    pub fn new(inquiries: Vec<WholesaleInquiry>) -> Self {
        Self::with_mode(inquiries, false)
    }

    /// An app seeded with `inquiries`, optionally in test mode.
    #[must_use]
    pub fn with_mode(inquiries: Vec<WholesaleInquiry>, test_mode: bool) -> Self {
        let store = Arc::new(MemoryInquiryStore::with(inquiries));
        let directory = Arc::new(RecordingCustomerDirectory::new());
        let mode = if test_mode {
            ApprovalMode::TestBypass
        } else {
            ApprovalMode::Live
        };

        let approvals = ApprovalService::new(store.clone(), directory.clone(), mode);
        let state = AppState::new(test_config(test_mode), store.clone(), approvals);

        Self {
            router: routes::app(state),
            store,
            directory,
        }
    }

    /// Send a request through the full middleware stack.
    ///
    /// # Panics
    ///
    /// Panics if the router fails, which it never does for axum handlers.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// `GET path`.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn get(&self, path: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    /// `POST /app/approve` with a URL-encoded form body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built.
    pub async fn approve_form(&self, form: &str, accept: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/app/approve")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(accept) = accept {
            builder = builder.header("accept", accept);
        }
        self.send(builder.body(Body::from(form.to_string())).expect("valid request"))
            .await
    }
}

/// Buffer a response body as UTF-8 text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
        .await
        .expect("readable body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Buffer a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not valid JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).expect("JSON body")
}
