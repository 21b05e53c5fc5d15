//! Integration tests for RocketShoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_client` - `HttpCatalog` against a fake catalog API
//! - `cart_flow` - `CartStore` end to end with HTTP catalog and file storage
//!
//! The fake catalog is an `axum` router bound to an ephemeral localhost port,
//! serving `GET /stock/{id}` and `GET /products/{id}` from in-memory tables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_core::{ProductData, ProductId, StockInfo};
use rust_decimal::Decimal;

#[derive(Default)]
struct CatalogTables {
    stock: HashMap<u64, u32>,
    products: HashMap<u64, ProductData>,
    fail_with: Option<StatusCode>,
    malformed: bool,
    stock_requests: usize,
    product_requests: usize,
    last_authorization: Option<String>,
}

type Shared = Arc<Mutex<CatalogTables>>;

/// Fake catalog/stock API running in the test process.
#[derive(Clone)]
pub struct FakeCatalogServer {
    addr: SocketAddr,
    tables: Shared,
}

impl FakeCatalogServer {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let tables = Shared::default();

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(tables.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake catalog");
        let addr = listener.local_addr().expect("fake catalog address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake catalog server");
        });

        Self { addr, tables }
    }

    /// Base URL to point `HttpCatalog` at.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut CatalogTables) -> T) -> T {
        f(&mut self.tables.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Register a product with the given stock level.
    pub fn add_product(&self, id: u64, title: &str, price: Decimal, stock: u32) {
        self.with_tables(|t| {
            t.stock.insert(id, stock);
            t.products.insert(
                id,
                ProductData {
                    id: ProductId::new(id),
                    title: title.to_string(),
                    price,
                    image: format!("https://cdn.rocketshoes.test/{id}.jpg"),
                },
            );
        });
    }

    /// Change the stock level of a product.
    pub fn set_stock(&self, id: u64, stock: u32) {
        self.with_tables(|t| {
            t.stock.insert(id, stock);
        });
    }

    /// Answer every request with this status.
    pub fn fail_with(&self, status: StatusCode) {
        self.with_tables(|t| t.fail_with = Some(status));
    }

    /// Answer every request with a body that is not valid JSON for the endpoint.
    pub fn serve_malformed(&self) {
        self.with_tables(|t| t.malformed = true);
    }

    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.with_tables(|t| t.stock_requests)
    }

    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.with_tables(|t| t.product_requests)
    }

    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.with_tables(|t| t.last_authorization.clone())
    }
}

fn record_auth(tables: &mut CatalogTables, headers: &HeaderMap) {
    tables.last_authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
}

fn override_response(tables: &CatalogTables) -> Option<Response> {
    if let Some(status) = tables.fail_with {
        return Some((status, "catalog unavailable").into_response());
    }
    if tables.malformed {
        return Some(Json(serde_json::json!({ "unexpected": true })).into_response());
    }
    None
}

async fn stock(State(tables): State<Shared>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let mut tables = tables.lock().unwrap_or_else(PoisonError::into_inner);
    tables.stock_requests += 1;
    record_auth(&mut tables, &headers);

    if let Some(response) = override_response(&tables) {
        return response;
    }

    tables.stock.get(&id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |&amount| {
            Json(StockInfo {
                id: ProductId::new(id),
                amount,
            })
            .into_response()
        },
    )
}

async fn product(State(tables): State<Shared>, Path(id): Path<u64>, headers: HeaderMap) -> Response {
    let mut tables = tables.lock().unwrap_or_else(PoisonError::into_inner);
    tables.product_requests += 1;
    record_auth(&mut tables, &headers);

    if let Some(response) = override_response(&tables) {
        return response;
    }

    tables.products.get(&id).cloned().map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}
