//! Wholesale Bridge CLI - database migrations and inquiry management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! wb-cli migrate
//!
//! # Create, list and approve inquiries
//! wb-cli inquiry create --company "Acme" --first-name Ada --last-name Lovelace --email ada@acme.test
//! wb-cli inquiry list
//! wb-cli inquiry approve 12
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "wb-cli")]
#[command(author, version, about = "Wholesale Bridge CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage wholesale inquiries
    Inquiry {
        #[command(subcommand)]
        action: InquiryAction,
    },
}

#[derive(Subcommand)]
enum InquiryAction {
    /// Insert a new PENDING inquiry
    Create {
        /// Company name
        #[arg(long)]
        company: String,

        /// Contact first name
        #[arg(long)]
        first_name: String,

        /// Contact last name
        #[arg(long)]
        last_name: String,

        /// Contact email address
        #[arg(short, long)]
        email: String,

        /// Contact phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
    /// List inquiries, newest first
    List,
    /// Approve an inquiry and provision its Shopify customer
    Approve {
        /// Inquiry ID
        id: i32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Inquiry { action } => match action {
            InquiryAction::Create {
                company,
                first_name,
                last_name,
                email,
                phone,
            } => {
                commands::inquiry::create(commands::inquiry::CreateArgs {
                    company,
                    first_name,
                    last_name,
                    email,
                    phone,
                })
                .await?;
            }
            InquiryAction::List => commands::inquiry::list().await?,
            InquiryAction::Approve { id } => commands::inquiry::approve(id).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_inquiry_create() {
        let cli = Cli::try_parse_from([
            "wb-cli",
            "inquiry",
            "create",
            "--company",
            "Acme",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
            "--email",
            "ada@acme.test",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Inquiry {
                action: InquiryAction::Create { phone: None, .. }
            })
        ));
    }

    #[test]
    fn test_parses_inquiry_approve() {
        let cli = Cli::try_parse_from(["wb-cli", "inquiry", "approve", "12"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Inquiry {
                action: InquiryAction::Approve { id: 12 }
            })
        ));
    }
}
