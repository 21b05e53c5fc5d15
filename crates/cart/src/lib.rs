//! RocketShoes Cart - Shopping cart state with stock checks and persistence.
//!
//! # Architecture
//!
//! [`CartStore`] owns the in-memory [`Cart`](rocketshoes_core::Cart) and talks
//! to three collaborators through traits:
//!
//! - [`Catalog`] - product metadata and authoritative stock levels
//! - [`CartStorage`] - string key-value slot the cart is mirrored into
//! - [`Notifier`] - user-facing error and success messages
//!
//! Every successful mutation overwrites the persisted cart in full. Failed
//! mutations leave both memory and storage untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, FileStorage, HttpCatalog, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config.catalog)?;
//! let storage = FileStorage::new(&config.storage.path);
//!
//! let mut store = CartStore::load(catalog, storage, TracingNotifier, &config.storage.key)?;
//! store.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogError, HttpCatalog};
pub use config::{CartConfig, CatalogConfig, ConfigError, StorageConfig};
pub use error::{CartError, CartMessage, CartOperation};
pub use notify::{BufferedNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartStore, DEFAULT_STORAGE_KEY, UpdateProductAmount};
