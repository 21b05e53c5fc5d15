//! Cart errors and the user-facing messages they map to.
//!
//! Every store operation returns `Result<(), CartError>` and also pushes a
//! [`CartMessage`] to the notifier. Internal details stay in the error (and the
//! logs); shoppers only ever see the message.

use std::fmt;

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Errors produced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Catalog or stock lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Requested quantity is not available.
    #[error("Requested {requested} units but only {available} in stock")]
    StockExceeded { requested: u64, available: u32 },

    /// Requested quantity is zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),
}

/// Store operation an error happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl fmt::Display for CartOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add_product",
            Self::Remove => "remove_product",
            Self::UpdateAmount => "update_product_amount",
        })
    }
}

/// User-facing cart messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMessage {
    OutOfStock,
    AmountMustBePositive,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl CartMessage {
    /// Message text shown to the shopper.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AmountMustBePositive => "Quantity must be greater than zero",
            Self::AddFailed => "Could not add product",
            Self::RemoveFailed => "Could not remove product",
            Self::UpdateFailed => "Could not change product quantity",
        }
    }
}

impl fmt::Display for CartMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl CartError {
    /// Message to show for this error when raised by `operation`.
    ///
    /// Validation failures get their own message; everything else collapses
    /// into the operation's generic failure message.
    #[must_use]
    pub const fn message(&self, operation: CartOperation) -> CartMessage {
        match (self, operation) {
            (Self::StockExceeded { .. }, CartOperation::Add | CartOperation::UpdateAmount) => {
                CartMessage::OutOfStock
            }
            (Self::InvalidAmount(_), CartOperation::UpdateAmount) => {
                CartMessage::AmountMustBePositive
            }
            (_, CartOperation::Add) => CartMessage::AddFailed,
            (_, CartOperation::Remove) => CartMessage::RemoveFailed,
            (_, CartOperation::UpdateAmount) => CartMessage::UpdateFailed,
        }
    }

    /// Whether this is a validation failure rather than a transport or storage fault.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::StockExceeded { .. } | Self::InvalidAmount(_) | Self::NotInCart(_)
        )
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
