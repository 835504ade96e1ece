//! Client-side shopping cart state for a storefront.
//!
//! The cart tracks which products a shopper selected and in what amounts,
//! survives restarts through a persisted snapshot, and checks every
//! quantity change against stock fetched from the remote catalog.
//!
//! - **Cart**: immutable snapshots and the [`CartStore`] that mutates them
//! - **Catalog**: stock and product lookups, with a REST implementation
//! - **Config**: API, storage and currency settings
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cart::prelude::*;
//!
//! let config = CartConfig::load("cart.toml")?;
//! let store = CartStore::from_config(&config)?;
//!
//! let cart = store.add_product(ProductId::new(1)).await?;
//! println!("{} items in cart", cart.total_amount());
//!
//! store.update_product_amount(ProductId::new(1), 3).await?;
//! store.remove_product(ProductId::new(1)).await?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod config;

pub use cart::{Cart, CartEntry, CartStore, CartStoreBuilder, Notifier, Warning, WarningKind};
pub use config::CartConfig;
pub use error::{CartError, CatalogError, ConfigError};
pub use ids::ProductId;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CatalogError, ConfigError};
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        Cart, CartEntry, CartOp, CartStore, CartStoreBuilder, LogNotifier, Notifier, Warning,
        WarningKind,
    };

    // Catalog
    pub use crate::catalog::{
        HttpCatalog, ProductCatalog, ProductDetails, StockRecord, StockService,
    };

    // Config
    pub use crate::config::{CartConfig, DEFAULT_STORAGE_KEY};
}
