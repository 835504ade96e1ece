//! Cart snapshots, the cart store and its warnings.

mod entry;
mod store;
mod warning;

pub use entry::{Cart, CartEntry};
pub use store::{CartStore, CartStoreBuilder};
pub use warning::{CartOp, LogNotifier, Notifier, Warning, WarningKind, OUT_OF_STOCK_MESSAGE};
