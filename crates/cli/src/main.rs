//! Bazaar CLI - catalog checks and offline cart tools.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally by category
//! bazaar catalog list --type currency
//!
//! # Check a catalog before publishing it
//! bazaar catalog check --source https://cdn.example.com/products.json
//!
//! # Work with a cart stored in a local JSON file
//! bazaar cart add acc-steam-01
//! bazaar cart update acc-steam-01 3
//! bazaar cart show
//!
//! # Dry-run checkout validation
//! bazaar checkout validate -n "Ali Rezaei" -e a@b.com -a "1234567890 Tehran" -c 1234567890123456
//! ```
//!
//! # Commands
//!
//! - `catalog list` / `catalog check` - Inspect a catalog file or URL
//! - `cart show|add|update|remove|clear` - Drive a file-backed cart
//! - `checkout validate` - Run the checkout rules without placing an order

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod storage;

/// Default catalog, relative to the workspace root.
const DEFAULT_CATALOG: &str = "crates/storefront/data/products.json";

/// Default cart file.
const DEFAULT_CART_FILE: &str = ".bazaar-cart.json";

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect a product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage a cart stored in a local file
    Cart {
        /// Cart file
        #[arg(short, long, default_value = DEFAULT_CART_FILE, global = true)]
        file: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
    /// Checkout tools
    Checkout {
        #[command(subcommand)]
        action: CheckoutAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Catalog file path or http(s) URL
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        source: String,

        /// Category to show (`all` for every product)
        #[arg(short = 't', long = "type", default_value = "all")]
        product_type: String,
    },
    /// Validate a catalog: parse it and look for duplicate ids
    Check {
        /// Catalog file path or http(s) URL
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        source: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with line totals
    Show,
    /// Add one unit of a catalog product
    Add {
        /// Product id
        id: String,

        /// Catalog file path or http(s) URL
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        source: String,
    },
    /// Set the quantity of an item (0 or less removes it)
    Update {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: String,
    },
    /// Remove an item
    Remove {
        /// Product id
        id: String,
    },
    /// Remove every item
    Clear,
}

#[derive(Subcommand)]
enum CheckoutAction {
    /// Validate checkout details without placing an order
    Validate {
        /// Full name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,

        /// Shipping address
        #[arg(short, long, default_value = "")]
        address: String,

        /// Card number (16 digits)
        #[arg(short, long, default_value = "")]
        card_number: String,
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
        Commands::Catalog { action } => match action {
            CatalogAction::List {
                source,
                product_type,
            } => commands::catalog::list(&source, &product_type).await?,
            CatalogAction::Check { source } => commands::catalog::check(&source).await?,
        },
        Commands::Cart { file, action } => match action {
            CartAction::Show => commands::cart::show(&file)?,
            CartAction::Add { id, source } => commands::cart::add(&file, &source, &id).await?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(&file, &id, &quantity)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&file, &id)?,
            CartAction::Clear => commands::cart::clear(&file)?,
        },
        Commands::Checkout { action } => match action {
            CheckoutAction::Validate {
                name,
                email,
                address,
                card_number,
            } => commands::checkout::validate(name, email, address, card_number)?,
        },
    }
    Ok(())
}
