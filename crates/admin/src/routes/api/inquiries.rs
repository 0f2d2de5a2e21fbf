//! Inquiry listing API.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use crate::{error::AppError, models::WholesaleInquiry, state::AppState};

/// Build the inquiries API router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/inquiries", get(list))
}

/// All inquiries, newest first.
///
/// # Errors
///
/// Returns 500 if the store query fails.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<WholesaleInquiry>>, AppError> {
    let inquiries = state.approvals().list_inquiries().await?;
    Ok(Json(inquiries))
}
