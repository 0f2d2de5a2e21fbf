//! Wholesale inquiry commands.
//!
//! # Usage
//!
//! ```bash
//! wb-cli inquiry create --company "Acme" --first-name Ada --last-name Lovelace --email ada@acme.test
//! wb-cli inquiry list
//! wb-cli inquiry approve 12
//! ```

use std::sync::Arc;

use wholesale_bridge_admin::config::AdminConfig;
use wholesale_bridge_admin::db::{self, InquiryStore, PgInquiryStore};
use wholesale_bridge_admin::models::{InquiryAddress, InquiryLinks, NewInquiry};
use wholesale_bridge_admin::services::{ApprovalMode, ApprovalService};
use wholesale_bridge_admin::shopify::AdminClient;
use wholesale_bridge_core::{Email, InquiryId};

use super::{CliError, connect};

/// Fields accepted by `inquiry create`.
pub struct CreateArgs {
    pub company: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Insert a new `PENDING` inquiry.
///
/// # Errors
///
/// Returns an error if the email is invalid or the insert fails.
pub async fn create(args: CreateArgs) -> Result<InquiryId, CliError> {
    let email =
        Email::parse(&args.email).map_err(|e| CliError::InvalidArgument("email", e.to_string()))?;

    for (name, value) in [
        ("company", &args.company),
        ("first name", &args.first_name),
        ("last name", &args.last_name),
    ] {
        if value.trim().is_empty() {
            return Err(CliError::InvalidArgument(name, "must not be blank".to_string()));
        }
    }

    let store = PgInquiryStore::new(connect().await?);
    let inquiry = store
        .insert(NewInquiry {
            company_name: args.company,
            first_name: args.first_name,
            last_name: args.last_name,
            email,
            phone_number: args.phone.filter(|p| !p.trim().is_empty()),
            address: InquiryAddress::default(),
            links: InquiryLinks::default(),
        })
        .await?;

    tracing::info!(inquiry_id = %inquiry.id, "Inquiry created");

    #[allow(clippy::print_stdout)]
    {
        println!("Created inquiry #{} ({})", inquiry.id, inquiry.company_name);
    }

    Ok(inquiry.id)
}

/// Print all inquiries, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list() -> Result<(), CliError> {
    let store = PgInquiryStore::new(connect().await?);
    let inquiries = store.list_newest_first().await?;

    #[allow(clippy::print_stdout)]
    {
        if inquiries.is_empty() {
            println!("No inquiries.");
        }
        for inquiry in &inquiries {
            println!(
                "#{:<6} {:<9} {:<30} {:<24} {}",
                inquiry.id.as_i32(),
                inquiry.status.as_str(),
                inquiry.company_name,
                inquiry.contact_name(),
                inquiry.email
            );
        }
    }

    Ok(())
}

/// Run the approval workflow for one inquiry.
///
/// Uses the same configuration as the admin server, including
/// `WHOLESALE_TEST_MODE`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the approval fails.
pub async fn approve(id: i32) -> Result<(), CliError> {
    let config = AdminConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let mode = if config.test_mode {
        tracing::warn!("WHOLESALE_TEST_MODE is enabled: no Shopify customer will be created");
        ApprovalMode::TestBypass
    } else {
        ApprovalMode::Live
    };

    let approvals = ApprovalService::new(
        Arc::new(PgInquiryStore::new(pool)),
        Arc::new(AdminClient::new(&config.shopify)?),
        mode,
    );

    let outcome = approvals.approve(InquiryId::new(id)).await?;

    #[allow(clippy::print_stdout)]
    {
        match &outcome.customer_id {
            Some(customer_id) => println!(
                "Approved inquiry #{} (customer {customer_id} {:?})",
                outcome.inquiry_id, outcome.action
            ),
            None => println!("Approved inquiry #{} (test mode)", outcome.inquiry_id),
        }
    }

    Ok(())
}
