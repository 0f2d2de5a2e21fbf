//! Business logic services for admin.
//!
//! # Services
//!
//! - `approval` - Inquiry listing and the find-or-create approval workflow

pub mod approval;

pub use approval::{
    ApprovalError, ApprovalMode, ApprovalOutcome, ApprovalService, SyncAction, customer_input_for,
};
