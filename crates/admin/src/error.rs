//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::ApprovalError;

/// Application-level error type for the admin service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Approval workflow failed. Rendered as `{"error": "..."}`.
    #[error("{0}")]
    Approval(#[from] ApprovalError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// HTTP status for each approval failure kind.
#[must_use]
pub const fn approval_status(err: &ApprovalError) -> StatusCode {
    match err {
        ApprovalError::MissingId | ApprovalError::NotFound(_) => StatusCode::NOT_FOUND,
        ApprovalError::AlreadyApproved(_) => StatusCode::CONFLICT,
        ApprovalError::Remote(_) => StatusCode::BAD_GATEWAY,
        ApprovalError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ApprovalError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Internal(_) => true,
            Self::Approval(err) => matches!(
                err,
                ApprovalError::Remote(_) | ApprovalError::Unknown(_)
            ),
            Self::NotFound(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        if let Self::Approval(err) = &self {
            return (
                approval_status(err),
                Json(json!({ "error": err.to_string() })),
            )
                .into_response();
        }

        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wholesale_bridge_core::InquiryId;

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("inquiry 7".to_string());
        assert_eq!(err.to_string(), "Not found: inquiry 7");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_approval_status_codes() {
        let id = InquiryId::new(1);
        assert_eq!(approval_status(&ApprovalError::MissingId), StatusCode::NOT_FOUND);
        assert_eq!(approval_status(&ApprovalError::NotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            approval_status(&ApprovalError::AlreadyApproved(id)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            approval_status(&ApprovalError::Remote("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            approval_status(&ApprovalError::Validation {
                field: "phone".to_string(),
                message: "is invalid".to_string(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            approval_status(&ApprovalError::Unknown("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_string()));
        assert!(err.is_server_error());
        assert_eq!(get_status(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
