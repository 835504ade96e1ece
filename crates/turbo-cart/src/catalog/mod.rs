//! Product catalog and stock lookups.
//!
//! The cart never owns product or stock data; it asks these services on
//! demand and keeps only the display fields it copies into entries.

mod http;
mod record;
mod service;

pub use http::HttpCatalog;
pub use record::{ProductDetails, StockRecord};
pub use service::{ProductCatalog, StockService};
