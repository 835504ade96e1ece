//! Service traits the cart depends on.

use async_trait::async_trait;

use crate::catalog::{ProductDetails, StockRecord};
use crate::error::CatalogError;
use crate::ids::ProductId;

/// Source of current stock levels.
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the current stock for a product.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError>;
}

/// Source of product details for products entering the cart.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch display details for a product.
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError>;
}
