//! Wholesale inquiry list and approval handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{Query, State},
    http::{HeaderMap, header::ACCEPT},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wholesale_bridge_core::InquiryId;

use crate::error::{AppError, approval_status};
use crate::models::WholesaleInquiry;
use crate::services::{ApprovalError, ApprovalOutcome, SyncAction};
use crate::state::AppState;

/// One row of the inquiry table.
#[derive(Debug, Clone)]
pub struct InquiryView {
    pub id: i32,
    pub company_name: String,
    pub contact_name: String,
    pub email: String,
    pub status: &'static str,
    pub is_pending: bool,
    pub submitted: String,
}

impl From<&WholesaleInquiry> for InquiryView {
    fn from(inquiry: &WholesaleInquiry) -> Self {
        Self {
            id: inquiry.id.as_i32(),
            company_name: inquiry.company_name.clone(),
            contact_name: inquiry.contact_name(),
            email: inquiry.email.clone(),
            status: inquiry.status.as_str(),
            is_pending: inquiry.status.is_pending(),
            submitted: inquiry.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Inquiry list page template.
#[derive(Template, WebTemplate)]
#[template(path = "inquiries/index.html")]
pub struct InquiriesIndexTemplate {
    pub inquiries: Vec<InquiryView>,
    /// Banner after a successful approval.
    pub notice: Option<String>,
    /// Banner after a failed approval.
    pub error: Option<String>,
    pub test_mode: bool,
}

/// Banner parameters set by the approve redirect.
#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub approved: Option<String>,
    pub error: Option<String>,
}

/// Approve form body.
///
/// Older embeds also post `email`, `name` and `company`; they are accepted
/// and ignored because every customer field comes from the stored inquiry.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveForm {
    #[serde(default)]
    pub id: Option<String>,
}

/// Successful approval body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse {
    pub success: bool,
    pub customer_id: Option<String>,
    pub action: SyncAction,
}

impl From<ApprovalOutcome> for ApproveResponse {
    fn from(outcome: ApprovalOutcome) -> Self {
        Self {
            success: true,
            customer_id: outcome.customer_id,
            action: outcome.action,
        }
    }
}

/// Display all inquiries, newest first.
///
/// GET /app
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<InquiriesIndexTemplate, AppError> {
    let inquiries = state.approvals().list_inquiries().await?;

    Ok(InquiriesIndexTemplate {
        inquiries: inquiries.iter().map(InquiryView::from).collect(),
        notice: query
            .approved
            .map(|id| format!("Inquiry #{id} approved")),
        error: query.error,
        test_mode: state.config().test_mode,
    })
}

/// Parse the submitted inquiry ID.
fn parse_inquiry_id(raw: Option<&str>) -> Result<InquiryId, ApprovalError> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .and_then(|id| id.parse().ok())
        .ok_or(ApprovalError::MissingId)
}

/// Whether the client asked for an HTML page rather than JSON.
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html") && !accept.contains("application/json"))
}

/// Approve an inquiry.
///
/// POST /app/approve
///
/// Responds with JSON, or with a redirect back to the list (carrying a
/// banner message) when the form was submitted by a browser page.
#[instrument(skip(state, headers, form), fields(inquiry_id = ?form.id))]
pub async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ApproveForm>,
) -> Response {
    let result = match parse_inquiry_id(form.id.as_deref()) {
        Ok(id) => state.approvals().approve(id).await,
        Err(e) => Err(e),
    };

    if wants_html(&headers) {
        return redirect_to_list(&result);
    }

    match result {
        Ok(outcome) => Json(ApproveResponse::from(outcome)).into_response(),
        Err(e) => AppError::Approval(e).into_response(),
    }
}

fn redirect_to_list(result: &Result<ApprovalOutcome, ApprovalError>) -> Response {
    let query = match result {
        Ok(outcome) => format!("approved={}", outcome.inquiry_id),
        Err(e) => {
            if approval_status(e).is_server_error() {
                tracing::error!(error = %e, "Approval failed");
            }
            format!("error={}", urlencoding::encode(&e.to_string()))
        }
    };
    Redirect::to(&format!("/app?{query}")).into_response()
}
