//! Cart line items and the ordered cart collection.
//!
//! The JSON shape of [`Cart`] is the persisted format: a bare array of
//! `{id, title, price, image, amount}` objects with `price` as a number.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::ProductData;

/// A product bound to a requested quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Requested quantity, always at least 1.
    pub amount: u32,
}

impl CartItem {
    /// Create a line item for a product with an amount of 1.
    #[must_use]
    pub fn from_product(product: ProductData) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// Price multiplied by amount.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }
}

/// Result of looking up a product id in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartLookup<'a> {
    Found(&'a CartItem),
    NotFound,
}

impl CartLookup<'_> {
    /// Amount the item would have after adding one more unit.
    #[must_use]
    pub const fn next_amount(&self) -> u32 {
        match self {
            Self::Found(item) => item.amount.saturating_add(1),
            Self::NotFound => 1,
        }
    }
}

/// Ordered collection of line items with unique ids.
///
/// Order is insertion order. All mutators preserve id uniqueness; callers
/// decide whether a mutation is allowed (stock checks live in the store).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a product by id.
    #[must_use]
    pub fn lookup(&self, id: ProductId) -> CartLookup<'_> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map_or(CartLookup::NotFound, CartLookup::Found)
    }

    /// Append an item, replacing any existing item with the same id in place.
    pub fn push(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
    }

    /// Set the amount of the item with the given id.
    ///
    /// Returns `false` if no item matched.
    pub fn set_amount(&mut self, id: ProductId, amount: u32) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove the item with the given id, returning it.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all item amounts.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all item subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from items, keeping the first occurrence of each id.
    fn from(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if matches!(cart.lookup(item.id), CartLookup::NotFound) {
                cart.items.push(item);
            }
        }
        cart
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: u64, amount: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Shoe {id}"),
            price: Decimal::new(17990, 2),
            image: format!("https://example.com/{id}.jpg"),
            amount,
        }
    }

    #[test]
    fn test_lookup_found_and_not_found() {
        let cart = Cart::from(vec![item(1, 2)]);
        assert!(matches!(cart.lookup(ProductId::new(1)), CartLookup::Found(i) if i.amount == 2));
        assert_eq!(cart.lookup(ProductId::new(2)), CartLookup::NotFound);
    }

    #[test]
    fn test_lookup_zero_id_is_found() {
        let cart = Cart::from(vec![item(0, 1)]);
        assert!(matches!(cart.lookup(ProductId::new(0)), CartLookup::Found(_)));
    }

    #[test]
    fn test_next_amount() {
        let existing = item(1, 2);
        assert_eq!(CartLookup::Found(&existing).next_amount(), 3);
        assert_eq!(CartLookup::NotFound.next_amount(), 1);
    }

    #[test]
    fn test_push_keeps_ids_unique_and_order() {
        let mut cart = Cart::new();
        cart.push(item(1, 1));
        cart.push(item(2, 1));
        cart.push(item(1, 4));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id, ProductId::new(1));
        assert_eq!(cart.items()[0].amount, 4);
        assert_eq!(cart.items()[1].id, ProductId::new(2));
    }

    #[test]
    fn test_set_amount_only_touches_matching_item() {
        let mut cart = Cart::from(vec![item(1, 1), item(2, 1)]);
        assert!(cart.set_amount(ProductId::new(2), 5));
        assert_eq!(cart.items()[0].amount, 1);
        assert_eq!(cart.items()[1].amount, 5);
        assert!(!cart.set_amount(ProductId::new(9), 5));
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from(vec![item(1, 1), item(2, 1), item(3, 1)]);
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));
        let ids: Vec<u64> = cart.items().iter().map(|i| i.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_from_vec_drops_duplicate_ids() {
        let cart = Cart::from(vec![item(1, 1), item(1, 7)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].amount, 1);
    }

    #[test]
    fn test_deserialize_drops_duplicate_ids() {
        let json = r#"[{"id":1,"title":"a","price":1,"image":"x","amount":1},{"id":1,"title":"b","price":2,"image":"y","amount":3}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].title, "a");
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from(vec![item(1, 2), item(2, 1)]);
        assert_eq!(cart.total_amount(), 3);
        assert_eq!(cart.total(), Decimal::new(53970, 2));
        assert_eq!(Cart::new().total(), Decimal::ZERO);
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_fields() {
        let cart = Cart::from(vec![item(3, 2), item(1, 1)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""price":179.9"#));

        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserializes_browser_storage_format() {
        let json = r#"[{"id":1,"title":"Tênis de Caminhada Leve Confortável","price":179.9,"image":"https://example.com/1.jpg","amount":2}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].amount, 2);
        assert_eq!(cart.items()[0].price, Decimal::new(1799, 1));
    }
}
