//! Cart and catalog error types.

use std::path::PathBuf;

use thiserror::Error;
use turbo_cache::CacheError;
use turbo_data::FetchError;

use crate::cart::WarningKind;
use crate::ids::ProductId;

/// Errors from the remote product and stock service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The service does not know the product.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The request failed or the response could not be decoded.
    #[error("Catalog request failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Errors that can occur in cart operations.
///
/// Every variant leaves the cart exactly as it was before the call.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested amount exceeds the stock reported by the service.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// The product has no entry in the cart.
    #[error("Item not in cart: {0}")]
    NotFound(ProductId),

    /// Stock or product lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Reading or writing the persisted snapshot failed.
    #[error("Cart storage error: {0}")]
    Storage(#[from] CacheError),
}

/// Errors loading a [`CartConfig`](crate::config::CartConfig) file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to parse JSON config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl CartError {
    /// True for failures caused by an unavailable collaborator rather than
    /// by the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, CartError::Catalog(_) | CartError::Storage(_))
    }

    /// How the failure is surfaced to the shopper.
    pub fn warning_kind(&self) -> WarningKind {
        match self {
            CartError::OutOfStock { .. } => WarningKind::OutOfStock,
            CartError::NotFound(_) => WarningKind::NotFound,
            CartError::Catalog(_) | CartError::Storage(_) => WarningKind::Failure,
        }
    }
}
