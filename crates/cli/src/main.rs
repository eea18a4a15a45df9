//! Lead Tracker CLI - Database migrations and admin provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! leads-cli migrate
//!
//! # Create admin account
//! leads-cli admin create -u alice -p 'correct horse battery staple' -e alice@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "leads-cli")]
#[command(author, version, about = "Lead Tracker CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (stored as an Argon2id hash)
        #[arg(short, long)]
        password: String,

        /// Contact email address
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
            } => {
                commands::admin::create_user(&username, &password, email.as_deref()).await?;
            }
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
    fn test_parses_admin_create() {
        let cli = Cli::try_parse_from([
            "leads-cli", "admin", "create", "-u", "alice", "-p", "pw123", "-e", "a@b.co",
        ]);
        assert!(matches!(
            cli.map(|cli| cli.command),
            Ok(Commands::Admin {
                action: AdminAction::Create { ref username, ref email, .. }
            }) if username == "alice" && email.as_deref() == Some("a@b.co")
        ));
    }

    #[test]
    fn test_admin_create_requires_password() {
        assert!(Cli::try_parse_from(["leads-cli", "admin", "create", "-u", "alice"]).is_err());
    }
}
