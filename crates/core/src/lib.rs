//! Wholesale Bridge Core - Shared domain types.
//!
//! This crate provides the types shared by the Wholesale Bridge components:
//! - `admin` - Embedded admin service (inquiry listing and approval)
//! - `cli` - Command-line tools for migrations and inquiry management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for inquiry IDs, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
