//! Type-safe key-value persistence for cart snapshots and other session state.
//!
//! Provides a simple, ergonomic API for persisting data in a key-value store
//! with automatic JSON serialization. Two backends ship with the crate:
//! [`MemoryStore`] for tests and ephemeral sessions, and [`FileStore`] for
//! state that has to survive a restart.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct CartEntry {
//!     product_id: i64,
//!     amount: u32,
//! }
//!
//! let cache = Cache::open_file("storage.json")?;
//!
//! // Store a value
//! cache.set("@RocketShoes:cart", &entries)?;
//!
//! // Retrieve a value
//! let entries: Option<Vec<CartEntry>> = cache.get("@RocketShoes:cart")?;
//!
//! // Delete a value
//! cache.delete("@RocketShoes:cart")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
