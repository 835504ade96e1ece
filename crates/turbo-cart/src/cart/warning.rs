//! User-visible warnings raised by failed cart operations.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::error::CartError;
use crate::ids::ProductId;

/// The cart operation that produced a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOp {
    Add,
    Remove,
    Update,
}

impl CartOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOp::Add => "add",
            CartOp::Remove => "remove",
            CartOp::Update => "update",
        }
    }

    /// Generic message shown when the operation fails for any reason other
    /// than insufficient stock.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CartOp::Add => "Failed to add product",
            CartOp::Remove => "Failed to remove product",
            CartOp::Update => "Failed to update product quantity",
        }
    }
}

impl fmt::Display for CartOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The requested amount exceeds available stock.
    OutOfStock,
    /// The product is not in the cart.
    NotFound,
    /// A service or storage call failed.
    Failure,
}

/// Message shown for [`WarningKind::OutOfStock`].
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// A warning to surface to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub op: CartOp,
    pub kind: WarningKind,
    pub product_id: ProductId,
    pub message: String,
}

impl Warning {
    /// Build the warning for a failed operation.
    pub fn from_error(op: CartOp, product_id: ProductId, error: &CartError) -> Self {
        let kind = error.warning_kind();
        let message = match kind {
            WarningKind::OutOfStock => OUT_OF_STOCK_MESSAGE,
            WarningKind::NotFound | WarningKind::Failure => op.failure_message(),
        };
        Self {
            op,
            kind,
            product_id,
            message: message.to_string(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sink for user-visible warnings, typically a toast in the UI layer.
pub trait Notifier: Send + Sync {
    fn notify(&self, warning: &Warning);
}

/// Notifier that only logs. Used when no UI sink is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, warning: &Warning) {
        warn!(
            op = %warning.op,
            kind = ?warning.kind,
            product_id = %warning.product_id,
            "{}",
            warning.message
        );
    }
}

/// Forwards warnings to a channel. A closed receiver drops them.
impl Notifier for UnboundedSender<Warning> {
    fn notify(&self, warning: &Warning) {
        let _ = self.send(warning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use turbo_data::FetchError;

    #[test]
    fn test_out_of_stock_message() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(2),
            requested: 1,
            available: 0,
        };
        let warning = Warning::from_error(CartOp::Add, ProductId::new(2), &err);
        assert_eq!(warning.kind, WarningKind::OutOfStock);
        assert_eq!(warning.message, "Requested quantity is out of stock");
    }

    #[test]
    fn test_failure_messages_per_operation() {
        let err = CartError::from(CatalogError::from(FetchError::Timeout));
        let id = ProductId::new(1);
        assert_eq!(
            Warning::from_error(CartOp::Add, id, &err).message,
            "Failed to add product"
        );
        assert_eq!(
            Warning::from_error(CartOp::Update, id, &err).message,
            "Failed to update product quantity"
        );

        let missing = Warning::from_error(CartOp::Remove, id, &CartError::NotFound(id));
        assert_eq!(missing.kind, WarningKind::NotFound);
        assert_eq!(missing.to_string(), "Failed to remove product");
    }

    #[test]
    fn test_channel_notifier() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let warning = Warning::from_error(
            CartOp::Remove,
            ProductId::new(9),
            &CartError::NotFound(ProductId::new(9)),
        );
        tx.notify(&warning);
        assert_eq!(rx.try_recv().unwrap(), warning);

        drop(rx);
        tx.notify(&warning);
    }
}
