//! Cart command helpers: store construction and summary rendering.

use std::path::PathBuf;

use rocketshoes_cart::{
    CartConfig, CartError, CartStore, CatalogConfig, FileStorage, HttpCatalog, TracingNotifier,
};
use rocketshoes_core::{Cart, CurrencyCode, Price};
use thiserror::Error;
use tracing::info;

/// Store wired to the real collaborators.
pub type CliStore = CartStore<HttpCatalog, FileStorage, TracingNotifier>;

/// Errors that can occur while preparing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] rocketshoes_cart::ConfigError),

    #[error("Catalog client error: {0}")]
    Catalog(#[from] rocketshoes_cart::CatalogError),

    #[error("Could not load cart: {0}")]
    Load(#[from] rocketshoes_cart::CartError),
}

/// How a failed command is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// The store turned the request down and already told the shopper why.
    Rejected,
    /// The store already logged the fault at error level.
    Reported,
    /// Failed before reaching the store.
    Unreported,
}

impl Failure {
    /// Process exit code for this failure.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Rejected => 3,
            Self::Reported | Self::Unreported => 1,
        }
    }
}

/// Classify a command error so it is logged at error level exactly once.
#[must_use]
pub fn classify(error: &(dyn std::error::Error + 'static)) -> Failure {
    match error.downcast_ref::<CartError>() {
        Some(e) if e.is_validation() => Failure::Rejected,
        Some(_) => Failure::Reported,
        None => Failure::Unreported,
    }
}

/// Apply command-line overrides on top of the environment configuration.
///
/// # Errors
///
/// Returns `CommandError::Config` if the catalog URL is invalid.
pub fn apply_overrides(
    config: &mut CartConfig,
    storage: Option<PathBuf>,
    catalog_url: Option<&str>,
) -> Result<(), CommandError> {
    if let Some(path) = storage {
        config.storage.path = path;
    }
    if let Some(url) = catalog_url {
        let overridden = CatalogConfig::with_base_url(url)?;
        config.catalog.base_url = overridden.base_url;
    }
    Ok(())
}

/// Build the cart store from configuration, hydrating from the storage file.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or storage cannot be read.
pub fn open_store(config: &CartConfig) -> Result<CliStore, CommandError> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    let storage = FileStorage::new(&config.storage.path);
    let store = CartStore::load(catalog, storage, TracingNotifier, &config.storage.key)?;
    Ok(store)
}

/// One display line per cart item plus a total line.
#[must_use]
pub fn summary_lines(cart: &Cart, currency: CurrencyCode) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "#{} {} x{} @ {} = {}",
                item.id,
                item.title,
                item.amount,
                Price::new(item.price, currency),
                Price::new(item.subtotal(), currency),
            )
        })
        .collect();

    lines.push(format!(
        "{} product(s), {} unit(s), total {}",
        cart.len(),
        cart.total_amount(),
        Price::new(cart.total(), currency),
    ));
    lines
}

/// Log the cart summary.
pub fn print_summary(cart: &Cart, currency: CurrencyCode) {
    for line in summary_lines(cart, currency) {
        info!("{line}");
    }
}
