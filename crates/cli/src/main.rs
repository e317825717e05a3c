//! Avento CLI - Terminal storefront front-end.
//!
//! A thin view layer over `avento-client`: every subcommand renders state
//! and dispatches a container mutator. Quantity policy (0 removes a line,
//! more than 50 is rejected) and the Wishlist guard live here, not in the
//! containers.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! avento products search "canvas tote"
//!
//! # Manage the cart and check out
//! avento cart add 66f2a1 --quantity 2
//! avento cart checkout --name "Ada" --address "221B Baker Street, London"
//!
//! # Account and saved lists
//! avento auth login -e ada@example.com
//! avento lists add <list-id> <product-id>
//! ```
//!
//! # Environment Variables
//!
//! - `AVENTO_API_BASE_URL` - Backend API base URL
//! - `AVENTO_DATA_DIR` - Directory for locally persisted state
//! - `AVENTO_GEOCODER_BASE_URL` - Address autocomplete service

#![cfg_attr(not(test), forbid(unsafe_code))]
// A terminal front-end's output surface is stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "avento")]
#[command(author, version, about = "Avento storefront")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        #[command(subcommand)]
        action: commands::products::ProductsAction,
    },
    /// Manage the local cart and check out
    Cart {
        #[command(subcommand)]
        action: commands::cart::CartAction,
    },
    /// Manage saved lists
    Lists {
        #[command(subcommand)]
        action: commands::lists::ListsAction,
    },
    /// Account registration, login, and removal
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// User preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Past orders
    Orders {
        #[command(subcommand)]
        action: commands::orders::OrdersAction,
    },
    /// Delivery address lookup
    Address {
        #[command(subcommand)]
        action: commands::address::AddressAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "avento_cli=info,avento_client=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let app = App::init(cli.yes)?;

    match cli.command {
        Commands::Products { action } => commands::products::run(&app, action).await?,
        Commands::Cart { action } => commands::cart::run(&app, action).await?,
        Commands::Lists { action } => commands::lists::run(&app, action).await?,
        Commands::Auth { action } => commands::auth::run(&app, action).await?,
        Commands::Settings { action } => commands::settings::run(&app, action).await?,
        Commands::Orders { action } => commands::orders::run(&app, action).await?,
        Commands::Address { action } => commands::address::run(&app, action).await?,
    }
    Ok(())
}
