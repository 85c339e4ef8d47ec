//! Shopdesk CLI - database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shopdesk migrate
//!
//! # Create a store for a user
//! shopdesk store create --owner user_2abc --name "Outlet"
//!
//! # Print the identity signature header for a user
//! shopdesk identity sign --user user_2abc
//!
//! # Create a demo store with catalog and orders
//! shopdesk seed --owner user_2abc
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `store create` - Create a store
//! - `identity sign` - Sign a user id for the `x-shopdesk-signature` header
//! - `seed` - Seed a demo store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(author, version, about = "Shopdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage stores
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Caller identity helpers
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },
    /// Create a demo store with billboards, catalog and orders
    Seed {
        /// User id that will own the demo store
        #[arg(short, long)]
        owner: String,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a new store
    Create {
        /// Owning user id (from the identity provider)
        #[arg(short, long)]
        owner: String,

        /// Store name
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum IdentityAction {
    /// Print the signature header value for a user id
    Sign {
        /// User id to sign
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Store { action } => match action {
            StoreAction::Create { owner, name } => {
                commands::store::create(&owner, &name).await?;
            }
        },
        Commands::Identity { action } => match action {
            IdentityAction::Sign { user } => commands::identity::sign(&user)?,
        },
        Commands::Seed { owner } => {
            commands::seed::demo_store(&owner).await?;
        }
    }
    Ok(())
}
