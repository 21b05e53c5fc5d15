//! Catalog and stock service access.
//!
//! # Architecture
//!
//! - [`Catalog`] is the seam the cart store depends on
//! - [`HttpCatalog`] talks to the REST API (`GET stock/{id}`, `GET products/{id}`)
//! - Product metadata is cached via `moka` (5 minute TTL); stock never is

mod client;

pub use client::HttpCatalog;

use async_trait::async_trait;
use rocketshoes_core::{ProductData, ProductId, StockInfo};
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog returned a non-success status.
    #[error("Catalog returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog answered for a different product than requested.
    #[error("Catalog returned product {returned} for request {requested}")]
    IdMismatch {
        requested: ProductId,
        returned: ProductId,
    },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Read access to product metadata and stock levels.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current available quantity for a product.
    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError>;

    /// Product metadata (title, price, image).
    async fn product(&self, id: ProductId) -> Result<ProductData, CatalogError>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for std::sync::Arc<C> {
    async fn stock(&self, id: ProductId) -> Result<StockInfo, CatalogError> {
        (**self).stock(id).await
    }

    async fn product(&self, id: ProductId) -> Result<ProductData, CatalogError> {
        (**self).product(id).await
    }
}
