//! Quartier Nord CLI - database migrations and account bootstrap.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (account table + session table)
//! quartier-cli migrate
//!
//! # Create the super-admin account
//! quartier-cli account create-super-admin \
//!     --login admin --mail admin@example.com --password "..." \
//!     --company-name "Administration"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quartier-cli")]
#[command(author, version, about = "Quartier Nord CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Create the super-admin account
    CreateSuperAdmin {
        /// Login used for authentication
        #[arg(short, long)]
        login: String,

        /// Contact email address
        #[arg(short, long)]
        mail: String,

        /// Password (6 to 20 characters)
        #[arg(short, long)]
        password: String,

        /// Display name of the account
        #[arg(short, long, default_value = "Administration")]
        company_name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::CreateSuperAdmin {
                login,
                mail,
                password,
                company_name,
            } => {
                commands::account::create_super_admin(&company_name, &login, &mail, &password)
                    .await?;
            }
        },
    }
    Ok(())
}
