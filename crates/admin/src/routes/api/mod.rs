//! JSON API route handlers for admin.

pub mod inquiries;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(inquiries::router())
}
