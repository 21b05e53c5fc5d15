//! Cart store: the in-memory cart plus its persisted mirror.
//!
//! Every mutation follows the same shape: validate, build the next cart on a
//! copy, persist it, then swap it in. A failure at any step notifies the
//! shopper and leaves memory and storage at the previous state.

use rocketshoes_core::{Cart, CartItem, CartLookup, ProductId};
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::Catalog;
use crate::error::{CartError, CartOperation, Result};
use crate::notify::{Notice, Notifier};
use crate::storage::CartStorage;

/// Storage key the cart is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a product's quantity.
///
/// `amount` is signed so that zero and negative requests from the UI reach
/// validation instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Shopping cart backed by a catalog, a key-value store, and a notifier.
///
/// Mutations take `&mut self`, so a store cannot run two of them at once.
pub struct CartStore<C, S, N> {
    cart: Cart,
    catalog: C,
    storage: S,
    notifier: N,
    key: String,
}

impl<C, S, N> std::fmt::Debug for CartStore<C, S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("items", &self.cart.len())
            .finish_non_exhaustive()
    }
}

impl<C, S, N> CartStore<C, S, N>
where
    C: Catalog,
    S: CartStorage,
    N: Notifier,
{
    /// Create a store, hydrating the cart from `storage[key]`.
    ///
    /// A missing value starts an empty cart. A value that does not parse as a
    /// cart is logged and also starts an empty cart; it is overwritten by the
    /// next successful mutation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the storage backend cannot be read.
    pub fn load(catalog: C, storage: S, notifier: N, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let cart = match storage.get_item(&key)? {
            Some(raw) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Persisted cart is unreadable, starting empty");
                Cart::new()
            }),
            None => Cart::new(),
        };

        debug!(key = %key, items = cart.len(), "Cart loaded");

        Ok(Self {
            cart,
            catalog,
            storage,
            notifier,
            key,
        })
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Notifier the store reports to.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Storage key the cart is mirrored to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a product.
    ///
    /// Increments an existing line or appends a new one with amount 1, as long
    /// as the resulting amount does not exceed available stock.
    ///
    /// # Errors
    ///
    /// `StockExceeded` when stock is insufficient; catalog, storage, or
    /// serialization errors otherwise. The cart is unchanged on error.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<()> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::Add, result, Some("Product added to cart"))
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<()> {
        let stock = self.catalog.stock(product_id).await?;

        let lookup = self.cart.lookup(product_id);
        let amount = lookup.next_amount();

        if amount > stock.amount {
            return Err(CartError::StockExceeded {
                requested: u64::from(amount),
                available: stock.amount,
            });
        }

        let mut next = self.cart.clone();
        match lookup {
            CartLookup::Found(_) => {
                next.set_amount(product_id, amount);
            }
            CartLookup::NotFound => {
                let product = self.catalog.product(product_id).await?;
                next.push(CartItem::from_product(product));
            }
        }

        self.commit(next)
    }

    /// Remove a product line entirely.
    ///
    /// # Errors
    ///
    /// `NotInCart` when no line has this id; storage or serialization errors
    /// otherwise. The cart is unchanged on error.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<()> {
        let result = self.try_remove_product(product_id);
        self.report(CartOperation::Remove, result, Some("Product removed from cart"))
    }

    fn try_remove_product(&mut self, product_id: ProductId) -> Result<()> {
        let mut next = self.cart.clone();
        if next.remove(product_id).is_none() {
            return Err(CartError::NotInCart(product_id));
        }
        self.commit(next)
    }

    /// Set a product's quantity.
    ///
    /// The amount must be positive and strictly below available stock. When no
    /// line matches, the cart is persisted unchanged and no notice is sent.
    ///
    /// # Errors
    ///
    /// `InvalidAmount` for zero or negative amounts, `StockExceeded` when the
    /// amount is not strictly below stock; catalog, storage, or serialization
    /// errors otherwise. The cart is unchanged on error.
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) -> Result<()> {
        let result = self.try_update_product_amount(update).await;
        let success = matches!(result, Ok(true)).then_some("Product quantity updated");
        self.report(CartOperation::UpdateAmount, result.map(drop), success)
    }

    /// Returns whether a line matched.
    async fn try_update_product_amount(&mut self, update: UpdateProductAmount) -> Result<bool> {
        let UpdateProductAmount { product_id, amount } = update;

        if amount <= 0 {
            return Err(CartError::InvalidAmount(amount));
        }

        let stock = self.catalog.stock(product_id).await?;

        // Requesting exactly the available stock is rejected here, unlike add.
        if i64::from(stock.amount) <= amount {
            return Err(CartError::StockExceeded {
                requested: amount.unsigned_abs(),
                available: stock.amount,
            });
        }

        let amount = u32::try_from(amount).map_err(|_| CartError::StockExceeded {
            requested: amount.unsigned_abs(),
            available: stock.amount,
        })?;

        let mut next = self.cart.clone();
        let matched = next.set_amount(product_id, amount);
        if !matched {
            debug!("Product not in cart, persisting unchanged cart");
        }

        self.commit(next)?;
        Ok(matched)
    }

    /// Remove every line and persist the empty cart.
    ///
    /// # Errors
    ///
    /// Storage or serialization errors. The cart is unchanged on error.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<()> {
        let mut next = self.cart.clone();
        next.clear();
        match self.commit(next) {
            Ok(()) => {
                self.notifier.notify(Notice::success("Cart cleared"));
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to clear cart");
                self.notifier.notify(Notice::error("Could not clear cart"));
                Err(e)
            }
        }
    }

    /// Persist `next` in full, then make it the current cart.
    fn commit(&mut self, next: Cart) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.storage.set_item(&self.key, &json)?;
        self.cart = next;
        Ok(())
    }

    fn report(
        &self,
        operation: CartOperation,
        result: Result<()>,
        success: Option<&str>,
    ) -> Result<()> {
        match &result {
            Ok(()) => {
                info!(%operation, items = self.cart.len(), "Cart updated");
                if let Some(message) = success {
                    self.notifier.notify(Notice::success(message));
                }
            }
            Err(e) => {
                if e.is_validation() {
                    info!(%operation, reason = %e, "Cart change rejected");
                } else {
                    error!(%operation, error = %e, "Cart operation failed");
                }
                self.notifier
                    .notify(Notice::error(e.message(operation).text()));
            }
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rocketshoes_core::{ProductData, StockInfo};
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::CatalogError;
    use crate::error::CartMessage;
    use crate::notify::BufferedNotifier;
    use crate::storage::{MemoryStorage, StorageError};

    // =========================================================================
    // Fakes
    // =========================================================================

    #[derive(Default)]
    struct FakeCatalog {
        stock: Mutex<HashMap<u64, u32>>,
        products: HashMap<u64, ProductData>,
        fail_stock: bool,
        product_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn with(entries: &[(u64, u32)]) -> Self {
            let mut catalog = Self::default();
            for &(id, amount) in entries {
                catalog.stock.lock().unwrap().insert(id, amount);
                catalog.products.insert(id, product(id));
            }
            catalog
        }

        fn set_stock(&self, id: u64, amount: u32) {
            self.stock.lock().unwrap().insert(id, amount);
        }
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn stock(&self, id: ProductId) -> std::result::Result<StockInfo, CatalogError> {
            if self.fail_stock {
                return Err(CatalogError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.stock
                .lock()
                .unwrap()
                .get(&id.as_u64())
                .map(|&amount| StockInfo { id, amount })
                .ok_or_else(|| CatalogError::NotFound(format!("stock/{id}")))
        }

        async fn product(&self, id: ProductId) -> std::result::Result<ProductData, CatalogError> {
            self.product_calls.fetch_add(1, Ordering::SeqCst);
            self.products
                .get(&id.as_u64())
                .cloned()
                .ok_or_else(|| CatalogError::NotFound(format!("products/{id}")))
        }
    }

    /// Storage whose writes always fail.
    struct FailingStorage(MemoryStorage);

    impl CartStorage for FailingStorage {
        fn get_item(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.0.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    fn product(id: u64) -> ProductData {
        ProductData {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: Decimal::new(17990, 2),
            image: format!("https://example.com/{id}.jpg"),
        }
    }

    fn item(id: u64, amount: u32) -> CartItem {
        CartItem {
            amount,
            ..CartItem::from_product(product(id))
        }
    }

    fn seeded(items: Vec<CartItem>) -> MemoryStorage {
        let json = serde_json::to_string(&Cart::from(items)).unwrap();
        MemoryStorage::with_item(DEFAULT_STORAGE_KEY, &json)
    }

    type TestStore = CartStore<FakeCatalog, MemoryStorage, BufferedNotifier>;

    fn store(catalog: FakeCatalog, storage: MemoryStorage) -> (TestStore, MemoryStorage, BufferedNotifier) {
        let notifier = BufferedNotifier::new();
        let store = CartStore::load(catalog, storage.clone(), notifier.clone(), DEFAULT_STORAGE_KEY)
            .unwrap();
        (store, storage, notifier)
    }

    fn persisted(storage: &MemoryStorage) -> Option<Cart> {
        storage
            .get_item(DEFAULT_STORAGE_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    fn amounts(cart: &Cart) -> Vec<(u64, u32)> {
        cart.items().iter().map(|i| (i.id.as_u64(), i.amount)).collect()
    }

    // =========================================================================
    // Load
    // =========================================================================

    #[test]
    fn test_load_empty_storage() {
        let (store, _, _) = store(FakeCatalog::default(), MemoryStorage::new());
        assert!(store.cart().is_empty());
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_load_hydrates_persisted_cart() {
        let (store, _, _) = store(FakeCatalog::default(), seeded(vec![item(2, 1), item(1, 3)]));
        assert_eq!(amounts(store.cart()), vec![(2, 1), (1, 3)]);
    }

    #[test]
    fn test_load_unreadable_value_starts_empty() {
        let storage = MemoryStorage::with_item(DEFAULT_STORAGE_KEY, "{not a cart");
        let (store, storage, _) = store(FakeCatalog::default(), storage);
        assert!(store.cart().is_empty());
        // Left in place until the next commit
        assert_eq!(
            storage.get_item(DEFAULT_STORAGE_KEY).unwrap().as_deref(),
            Some("{not a cart")
        );
    }

    // =========================================================================
    // add_product
    // =========================================================================

    #[tokio::test]
    async fn test_add_new_product_appends_one_item() {
        let (mut store, storage, notifier) = store(FakeCatalog::with(&[(1, 5)]), MemoryStorage::new());

        store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(store.cart().items(), &[item(1, 1)]);
        assert_eq!(persisted(&storage).unwrap(), *store.cart());
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_increments() {
        let (mut store, storage, _) = store(FakeCatalog::with(&[(1, 5)]), seeded(vec![item(1, 2)]));

        store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 3)]);
        assert_eq!(amounts(&persisted(&storage).unwrap()), vec![(1, 3)]);
        assert_eq!(store.catalog.product_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_add_preserves_position_of_existing_item() {
        let catalog = FakeCatalog::with(&[(1, 5), (2, 5), (3, 5)]);
        let (mut store, _, _) = store(catalog, seeded(vec![item(1, 1), item(2, 1), item(3, 1)]));

        store.add_product(ProductId::new(2)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 1), (2, 2), (3, 1)]);
    }

    #[tokio::test]
    async fn test_add_up_to_exact_stock_is_allowed() {
        let (mut store, _, _) = store(FakeCatalog::with(&[(1, 3)]), seeded(vec![item(1, 2)]));

        store.add_product(ProductId::new(1)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 3)]);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_is_rejected() {
        let (mut store, storage, notifier) =
            store(FakeCatalog::with(&[(1, 5)]), seeded(vec![item(1, 5)]));
        let before = storage.get_item(DEFAULT_STORAGE_KEY).unwrap();

        let err = store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::StockExceeded {
                requested: 6,
                available: 5
            }
        ));
        assert_eq!(amounts(store.cart()), vec![(1, 5)]);
        assert_eq!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap(), before);
        assert_eq!(notifier.errors(), vec![CartMessage::OutOfStock.to_string()]);
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_is_rejected() {
        let (mut store, _, notifier) = store(FakeCatalog::with(&[(1, 0)]), MemoryStorage::new());

        assert!(store.add_product(ProductId::new(1)).await.is_err());
        assert!(store.cart().is_empty());
        assert_eq!(notifier.errors(), vec![CartMessage::OutOfStock.to_string()]);
    }

    #[tokio::test]
    async fn test_add_product_id_zero() {
        let (mut store, _, _) = store(FakeCatalog::with(&[(0, 2)]), MemoryStorage::new());

        store.add_product(ProductId::new(0)).await.unwrap();
        store.add_product(ProductId::new(0)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(0, 2)]);
    }

    #[tokio::test]
    async fn test_add_stock_failure_reports_generic_error() {
        let catalog = FakeCatalog {
            fail_stock: true,
            ..FakeCatalog::with(&[(1, 5)])
        };
        let (mut store, storage, notifier) = store(catalog, MemoryStorage::new());

        let err = store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(_)));
        assert!(store.cart().is_empty());
        assert!(persisted(&storage).is_none());
        assert_eq!(notifier.errors(), vec![CartMessage::AddFailed.to_string()]);
    }

    #[tokio::test]
    async fn test_add_missing_metadata_reports_generic_error() {
        let catalog = FakeCatalog::default();
        catalog.set_stock(7, 3);
        let (mut store, storage, notifier) = store(catalog, MemoryStorage::new());

        let err = store.add_product(ProductId::new(7)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(CatalogError::NotFound(_))));
        assert!(store.cart().is_empty());
        assert!(persisted(&storage).is_none());
        assert_eq!(notifier.errors(), vec![CartMessage::AddFailed.to_string()]);
    }

    #[tokio::test]
    async fn test_add_storage_failure_leaves_cart_unchanged() {
        let notifier = BufferedNotifier::new();
        let storage = FailingStorage(seeded(vec![item(1, 1)]));
        let mut store = CartStore::load(
            FakeCatalog::with(&[(1, 5)]),
            storage,
            notifier.clone(),
            DEFAULT_STORAGE_KEY,
        )
        .unwrap();

        let err = store.add_product(ProductId::new(1)).await.unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(notifier.errors(), vec![CartMessage::AddFailed.to_string()]);
    }

    // =========================================================================
    // remove_product
    // =========================================================================

    #[test]
    fn test_remove_existing_product() {
        let (mut store, storage, notifier) =
            store(FakeCatalog::default(), seeded(vec![item(1, 1), item(2, 4), item(3, 1)]));

        store.remove_product(ProductId::new(2)).unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 1), (3, 1)]);
        assert_eq!(persisted(&storage).unwrap(), *store.cart());
        assert!(notifier.errors().is_empty());
    }

    #[test]
    fn test_remove_missing_product_is_error() {
        let (mut store, storage, notifier) = store(FakeCatalog::default(), seeded(vec![item(1, 1)]));
        let before = storage.get_item(DEFAULT_STORAGE_KEY).unwrap();

        let err = store.remove_product(ProductId::new(9)).unwrap_err();

        assert!(matches!(err, CartError::NotInCart(id) if id == ProductId::new(9)));
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap(), before);
        assert_eq!(notifier.errors(), vec![CartMessage::RemoveFailed.to_string()]);
    }

    #[test]
    fn test_remove_storage_failure_leaves_cart_unchanged() {
        let notifier = BufferedNotifier::new();
        let mut store = CartStore::load(
            FakeCatalog::default(),
            FailingStorage(seeded(vec![item(1, 1)])),
            notifier.clone(),
            DEFAULT_STORAGE_KEY,
        )
        .unwrap();

        assert!(store.remove_product(ProductId::new(1)).is_err());
        assert_eq!(amounts(store.cart()), vec![(1, 1)]);
        assert_eq!(notifier.errors(), vec![CartMessage::RemoveFailed.to_string()]);
    }

    // =========================================================================
    // update_product_amount
    // =========================================================================

    fn update(id: u64, amount: i64) -> UpdateProductAmount {
        UpdateProductAmount {
            product_id: ProductId::new(id),
            amount,
        }
    }

    #[tokio::test]
    async fn test_update_non_positive_amount_is_rejected() {
        let catalog = FakeCatalog {
            fail_stock: true,
            ..FakeCatalog::default()
        };
        let (mut store, _, notifier) = store(catalog, seeded(vec![item(1, 2)]));

        for amount in [0, -1, i64::MIN] {
            let err = store.update_product_amount(update(1, amount)).await.unwrap_err();
            assert!(matches!(err, CartError::InvalidAmount(a) if a == amount));
        }

        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
        assert_eq!(
            notifier.errors(),
            vec![CartMessage::AmountMustBePositive.to_string(); 3]
        );
    }

    #[tokio::test]
    async fn test_update_equal_to_stock_is_rejected() {
        let (mut store, _, notifier) = store(FakeCatalog::with(&[(1, 5)]), seeded(vec![item(1, 2)]));

        let err = store.update_product_amount(update(1, 5)).await.unwrap_err();

        assert!(matches!(err, CartError::StockExceeded { requested: 5, available: 5 }));
        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
        assert_eq!(notifier.errors(), vec![CartMessage::OutOfStock.to_string()]);
    }

    #[tokio::test]
    async fn test_update_one_below_stock_is_accepted() {
        let (mut store, storage, notifier) =
            store(FakeCatalog::with(&[(1, 5)]), seeded(vec![item(1, 2), item(2, 1)]));

        store.update_product_amount(update(1, 4)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 4), (2, 1)]);
        assert_eq!(persisted(&storage).unwrap(), *store.cart());
        assert_eq!(notifier.drain(), vec![Notice::success("Product quantity updated")]);
    }

    #[tokio::test]
    async fn test_update_above_stock_is_rejected() {
        let (mut store, _, _) = store(FakeCatalog::with(&[(1, 5)]), seeded(vec![item(1, 2)]));

        assert!(store.update_product_amount(update(1, 50)).await.is_err());
        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
    }

    #[tokio::test]
    async fn test_update_missing_product_persists_unchanged_cart() {
        let catalog = FakeCatalog::with(&[(1, 5), (2, 5)]);
        let (mut store, storage, notifier) = store(catalog, seeded(vec![item(1, 2)]));

        store.update_product_amount(update(2, 3)).await.unwrap();

        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
        assert_eq!(amounts(&persisted(&storage).unwrap()), vec![(1, 2)]);
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn test_update_stock_failure_reports_generic_error() {
        let catalog = FakeCatalog {
            fail_stock: true,
            ..FakeCatalog::with(&[(1, 5)])
        };
        let (mut store, _, notifier) = store(catalog, seeded(vec![item(1, 2)]));

        let err = store.update_product_amount(update(1, 3)).await.unwrap_err();

        assert!(matches!(err, CartError::Catalog(_)));
        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
        assert_eq!(notifier.errors(), vec![CartMessage::UpdateFailed.to_string()]);
    }

    #[tokio::test]
    async fn test_stock_is_checked_at_mutation_time() {
        let (mut store, _, _) = store(FakeCatalog::with(&[(1, 5)]), MemoryStorage::new());
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(1)).await.unwrap();

        store.catalog.set_stock(1, 2);

        assert!(store.add_product(ProductId::new(1)).await.is_err());
        assert_eq!(amounts(store.cart()), vec![(1, 2)]);
    }

    // =========================================================================
    // clear + persistence
    // =========================================================================

    #[test]
    fn test_clear_persists_empty_cart() {
        let (mut store, storage, notifier) = store(FakeCatalog::default(), seeded(vec![item(1, 1)]));

        store.clear().unwrap();

        assert!(store.cart().is_empty());
        assert!(persisted(&storage).unwrap().is_empty());
        assert_eq!(notifier.drain(), vec![Notice::success("Cart cleared")]);
    }

    #[tokio::test]
    async fn test_persisted_cart_reloads_identically() {
        let catalog = FakeCatalog::with(&[(1, 5), (2, 5), (3, 5)]);
        let (mut store, storage, _) = store(catalog, MemoryStorage::new());
        store.add_product(ProductId::new(3)).await.unwrap();
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(3)).await.unwrap();
        store.add_product(ProductId::new(2)).await.unwrap();

        let (reloaded, _, _) = self::store(FakeCatalog::default(), storage);

        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(amounts(reloaded.cart()), vec![(3, 2), (1, 1), (2, 1)]);
    }

    #[tokio::test]
    async fn test_custom_storage_key() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::load(
            FakeCatalog::with(&[(1, 5)]),
            storage.clone(),
            BufferedNotifier::new(),
            "shop:cart",
        )
        .unwrap();

        store.add_product(ProductId::new(1)).await.unwrap();

        assert!(storage.get_item("shop:cart").unwrap().is_some());
        assert!(storage.get_item(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }
}
