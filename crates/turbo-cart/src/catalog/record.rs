//! Records returned by the catalog service.

use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// Product details as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(alias = "name")]
    pub title: String,
    /// Unit price in major currency units, as the service sends it.
    pub price: f64,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

/// Available quantity as served by `GET /stock/{id}`.
///
/// Fetched fresh for every cart operation and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Product identifier.
    #[serde(alias = "productId")]
    pub id: ProductId,
    /// Units available.
    pub amount: u32,
}

impl StockRecord {
    /// Create a stock record.
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Check if `requested` units can be held in a cart.
    pub fn can_fulfill(&self, requested: i64) -> bool {
        requested <= i64::from(self.amount)
    }

    /// Check if out of stock.
    pub fn is_out_of_stock(&self) -> bool {
        self.amount == 0
    }
}
