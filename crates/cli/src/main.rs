//! RocketShoes CLI - Shopping cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//!
//! # Add one unit of product 1
//! rs-cart add 1
//!
//! # Set product 1 to 3 units
//! rs-cart update 1 3
//!
//! # Remove product 1
//! rs-cart remove 1
//!
//! # Empty the cart
//! rs-cart clear
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart and its total
//! - `add` - Add one unit of a product (checks stock)
//! - `remove` - Remove a product line
//! - `update` - Set a product's quantity (checks stock)
//! - `clear` - Remove every product
//!
//! Exits with 3 when the cart turns a request down (out of stock, bad
//! quantity, product not in cart), 1 on other failures, 2 on bad configuration.
//!
//! Configuration comes from the environment (see `rocketshoes_cart::config`);
//! `--storage` and `--catalog-url` override it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_cart::CartConfig;
use rocketshoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes shopping cart")]
struct Cli {
    /// Key-value file the cart is persisted into
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Base URL of the catalog/stock API
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart and its total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set the quantity of a product
    Update {
        /// Product id
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Remove every product from the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    Some(sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter`, optional JSON output, and Sentry.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cli=info,rocketshoes_cart=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        let failure = commands::classify(e.as_ref());
        match failure {
            commands::Failure::Rejected => tracing::debug!("Command rejected: {e}"),
            commands::Failure::Reported => tracing::debug!("Command failed: {e}"),
            commands::Failure::Unreported => tracing::error!("Command failed: {e}"),
        }
        std::process::exit(failure.exit_code());
    }
}

async fn run(cli: Cli, mut config: CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    commands::apply_overrides(&mut config, cli.storage, cli.catalog_url.as_deref())?;
    let mut store = commands::open_store(&config)?;

    match cli.command {
        Commands::Show => {}
        Commands::Add { id } => store.add_product(id).await?,
        Commands::Remove { id } => store.remove_product(id)?,
        Commands::Update { id, amount } => {
            store
                .update_product_amount(rocketshoes_cart::UpdateProductAmount {
                    product_id: id,
                    amount,
                })
                .await?;
        }
        Commands::Clear => store.clear()?,
    }

    commands::print_summary(store.cart(), config.currency);
    Ok(())
}
