//! Domain models for admin.

pub mod inquiry;

pub use inquiry::{InquiryAddress, InquiryLinks, NewInquiry, WholesaleInquiry};
pub(crate) use inquiry::present;
