//! ElectroVerse CLI - cart store maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the stored cart
//! ev-cli cart show
//!
//! # Reset the cart to the default seed items
//! ev-cli --data data/storefront.json cart seed
//!
//! # Empty the cart
//! ev-cli cart clear
//! ```
//!
//! The store path defaults to `STOREFRONT_DATA_PATH` when set, otherwise
//! `data/storefront.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ev-cli")]
#[command(author, version, about = "ElectroVerse CLI tools")]
struct Cli {
    /// Path of the cart store file
    #[arg(long, env = "STOREFRONT_DATA_PATH", default_value = "data/storefront.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print stored items and totals
    Show,
    /// Replace the cart with the default seed items
    Seed,
    /// Remove all items and totals
    Clear,
}

fn main() {
    // Load .env before clap reads env-backed args
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Cart { ref action } => match action {
            CartAction::Show => commands::cart::show(&cli.data)?,
            CartAction::Seed => commands::cart::seed(&cli.data)?,
            CartAction::Clear => commands::cart::clear(&cli.data)?,
        },
    }
    Ok(())
}
