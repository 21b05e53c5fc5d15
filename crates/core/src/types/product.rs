//! Catalog payloads: product metadata and stock levels.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Available quantity for a product, as reported by the stock service.
///
/// This is the authoritative value at the moment it was fetched; it is never
/// cached between cart mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u32,
}

/// Product metadata from the catalog (`GET products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub id: ProductId,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_info_from_json() {
        let stock: StockInfo = serde_json::from_str(r#"{"id":1,"amount":3}"#).unwrap();
        assert_eq!(stock.id, ProductId::new(1));
        assert_eq!(stock.amount, 3);
    }

    #[test]
    fn test_stock_info_rejects_negative_amount() {
        assert!(serde_json::from_str::<StockInfo>(r#"{"id":1,"amount":-1}"#).is_err());
    }

    #[test]
    fn test_product_data_from_json() {
        let json = r#"{
            "id": 2,
            "title": "Tênis VR Caminhada Confortável",
            "price": 139.9,
            "image": "https://example.com/shoe.jpg"
        }"#;
        let product: ProductData = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.price, Decimal::new(1399, 1));
        assert_eq!(product.image, "https://example.com/shoe.jpg");
    }
}
