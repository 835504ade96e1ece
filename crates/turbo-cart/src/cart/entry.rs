//! Cart entries and immutable cart snapshots.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

use crate::catalog::ProductDetails;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// One product in the cart with its selected amount.
///
/// Display fields are copied from the catalog when the product is first
/// added and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    /// Catalog product.
    pub product_id: ProductId,
    /// Selected quantity, always at least 1.
    pub amount: u32,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price.
    pub price: Money,
    /// Image URL.
    pub image: String,
}

impl CartEntry {
    /// Build a fresh entry for a product entering the cart.
    pub fn from_product(
        product_id: ProductId,
        details: &ProductDetails,
        amount: u32,
        currency: Currency,
    ) -> Self {
        Self {
            product_id,
            amount,
            name: details.title.clone(),
            price: Money::from_decimal(details.price, currency),
            image: details.image.clone(),
        }
    }

    /// A copy of this entry holding a different amount.
    pub fn with_amount(&self, amount: u32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// An immutable snapshot of the cart.
///
/// Entries keep the order in which products were first added. Cloning is
/// cheap and clones share storage, so two snapshots can be compared by
/// identity with [`Cart::same_snapshot`] as well as by value with `==`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    entries: Arc<[CartEntry]>,
}

impl Default for Cart {
    fn default() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl Cart {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from untrusted entries, such as a persisted one.
    ///
    /// Entries with a zero amount are dropped. When a product appears more
    /// than once only its first entry is kept.
    pub fn from_entries(entries: Vec<CartEntry>) -> Self {
        let total = entries.len();
        let mut seen = HashSet::with_capacity(total);
        let kept: Vec<CartEntry> = entries
            .into_iter()
            .filter(|entry| entry.amount >= 1 && seen.insert(entry.product_id))
            .collect();

        if kept.len() != total {
            warn!(dropped = total - kept.len(), "Discarded invalid cart entries");
        }

        Self {
            entries: kept.into(),
        }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartEntry> {
        self.entries.iter()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all amounts.
    pub fn total_amount(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.amount)).sum()
    }

    /// Get the entry for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    /// Check if a product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// True when both values are the very same snapshot.
    pub fn same_snapshot(&self, other: &Cart) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    /// A new snapshot with `entry` appended.
    pub(crate) fn with_appended(&self, entry: CartEntry) -> Self {
        let mut entries = self.entries.to_vec();
        entries.push(entry);
        Self {
            entries: entries.into(),
        }
    }

    /// A new snapshot where the entry for `entry.product_id` is replaced.
    pub(crate) fn with_replaced(&self, entry: CartEntry) -> Self {
        let entries: Vec<CartEntry> = self
            .entries
            .iter()
            .map(|e| {
                if e.product_id == entry.product_id {
                    entry.clone()
                } else {
                    e.clone()
                }
            })
            .collect();
        Self {
            entries: entries.into(),
        }
    }

    /// A new snapshot without `product_id`, or `None` if it was absent.
    pub(crate) fn without(&self, product_id: ProductId) -> Option<Self> {
        if !self.contains(product_id) {
            return None;
        }
        let entries: Vec<CartEntry> = self
            .entries
            .iter()
            .filter(|e| e.product_id != product_id)
            .cloned()
            .collect();
        Some(Self {
            entries: entries.into(),
        })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, amount: u32) -> CartEntry {
        CartEntry {
            product_id: ProductId::new(id),
            amount,
            name: format!("Product {}", id),
            price: Money::new(1000, Currency::USD),
            image: String::new(),
        }
    }

    #[test]
    fn test_from_product_copies_display_fields() {
        let details = ProductDetails {
            id: ProductId::new(1),
            title: "Tênis VR Caminhada".to_string(),
            price: 139.9,
            image: "https://example.com/1.jpg".to_string(),
        };
        let e = CartEntry::from_product(ProductId::new(1), &details, 1, Currency::BRL);
        assert_eq!(e.amount, 1);
        assert_eq!(e.name, "Tênis VR Caminhada");
        assert_eq!(e.price, Money::new(13990, Currency::BRL));
        assert_eq!(e.image, "https://example.com/1.jpg");
    }

    #[test]
    fn test_with_amount_leaves_original_untouched() {
        let original = entry(1, 1);
        let bumped = original.with_amount(2);
        assert_eq!(original.amount, 1);
        assert_eq!(bumped.amount, 2);
        assert_eq!(bumped.name, original.name);
    }

    #[test]
    fn test_snapshot_operations_preserve_order() {
        let cart = Cart::new().with_appended(entry(1, 1)).with_appended(entry(2, 1));
        let cart = cart.with_appended(entry(3, 4));
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_amount(), 6);

        let replaced = cart.with_replaced(entry(2, 5));
        let ids: Vec<i64> = replaced.iter().map(|e| e.product_id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(replaced.get(ProductId::new(2)).unwrap().amount, 5);
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 1);

        let removed = replaced.without(ProductId::new(2)).unwrap();
        let ids: Vec<i64> = removed.iter().map(|e| e.product_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(removed.without(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_snapshot_identity() {
        let cart = Cart::new().with_appended(entry(1, 1));
        let same = cart.clone();
        let rebuilt = cart.with_replaced(entry(1, 1));

        assert!(cart.same_snapshot(&same));
        assert_eq!(cart, rebuilt);
        assert!(!cart.same_snapshot(&rebuilt));
    }

    #[test]
    fn test_from_entries_sanitizes() {
        let cart = Cart::from_entries(vec![entry(1, 2), entry(2, 0), entry(1, 7), entry(3, 1)]);
        let kept: Vec<(i64, u32)> = cart.iter().map(|e| (e.product_id.get(), e.amount)).collect();
        assert_eq!(kept, vec![(1, 2), (3, 1)]);
    }

    #[test]
    fn test_serialized_shape() {
        let cart = Cart::new().with_appended(entry(1, 2));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "productId": 1,
                "amount": 2,
                "name": "Product 1",
                "price": { "amount_cents": 1000, "currency": "USD" },
                "image": ""
            }])
        );

        let back: Vec<CartEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(Cart::from_entries(back), cart);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.total_amount(), 0);
        assert!(!cart.contains(ProductId::new(1)));
        assert_eq!(serde_json::to_string(&cart).unwrap(), "[]");
    }
}
