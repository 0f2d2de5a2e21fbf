//! Wholesale Bridge admin library.
//!
//! Lists wholesale inquiries and approves them by provisioning a matching
//! Shopify customer, then marking the inquiry approved. Exposed as a library
//! so the CLI and integration tests can drive the same workflow and router.
//!
//! # Security
//!
//! This crate holds a Shopify Admin API token with write access to
//! customers. Deploy it behind the Shopify admin on private infrastructure.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
