//! The cart state machine.

use std::fmt;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};
use turbo_cache::Cache;
use turbo_data::FetchClient;

use crate::cart::{Cart, CartEntry, CartOp, LogNotifier, Notifier, Warning};
use crate::catalog::{HttpCatalog, ProductCatalog, StockRecord, StockService};
use crate::config::{CartConfig, DEFAULT_STORAGE_KEY};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Currency;

/// Authoritative in-memory cart with persisted, stock-checked mutations.
///
/// Cloning yields another handle to the same cart. Mutations run one at a
/// time; each holds the cart for its whole fetch, validate, persist and
/// publish sequence. Reading the current snapshot never waits on them.
///
/// A failed operation leaves both the in-memory and the persisted cart
/// untouched, returns the error and reports a [`Warning`] to the notifier.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

struct Inner {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    cache: Cache,
    storage_key: String,
    currency: Currency,
    notifier: Arc<dyn Notifier>,
    op_lock: Mutex<()>,
    snapshot: watch::Sender<Cart>,
}

/// Builder for [`CartStore`].
pub struct CartStoreBuilder {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    cache: Cache,
    storage_key: String,
    currency: Currency,
    notifier: Arc<dyn Notifier>,
}

impl CartStoreBuilder {
    /// Key the snapshot is persisted under.
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Currency applied to catalog prices of new entries.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sink for user-visible warnings. Defaults to [`LogNotifier`].
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Load the persisted snapshot and create the store.
    ///
    /// An absent or undecodable snapshot yields an empty cart. Failing to
    /// read storage at all is an error.
    #[instrument(skip_all, fields(key = %self.storage_key))]
    pub fn open(self) -> Result<CartStore, CartError> {
        let cart = load_snapshot(&self.cache, &self.storage_key)?;
        debug!(items = cart.len(), "Cart loaded");

        let (snapshot, _) = watch::channel(cart);
        Ok(CartStore {
            inner: Arc::new(Inner {
                stock: self.stock,
                catalog: self.catalog,
                cache: self.cache,
                storage_key: self.storage_key,
                currency: self.currency,
                notifier: self.notifier,
                op_lock: Mutex::new(()),
                snapshot,
            }),
        })
    }
}

fn load_snapshot(cache: &Cache, key: &str) -> Result<Cart, CartError> {
    match cache.get::<Vec<CartEntry>>(key) {
        Ok(Some(entries)) => Ok(Cart::from_entries(entries)),
        Ok(None) => Ok(Cart::new()),
        Err(e) if e.is_corrupt_value() => {
            warn!(error = %e, "Persisted cart is unreadable, starting empty");
            Ok(Cart::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn ensure_stock(
    product_id: ProductId,
    requested: i64,
    stock: &StockRecord,
) -> Result<u32, CartError> {
    if !stock.can_fulfill(requested) {
        return Err(CartError::OutOfStock {
            product_id,
            requested,
            available: stock.amount,
        });
    }
    // Bounded by the stock amount, which is a u32.
    u32::try_from(requested).map_err(|_| CartError::OutOfStock {
        product_id,
        requested,
        available: stock.amount,
    })
}

impl CartStore {
    /// Start building a store over the given services and storage.
    pub fn builder(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn ProductCatalog>,
        cache: Cache,
    ) -> CartStoreBuilder {
        CartStoreBuilder {
            stock,
            catalog,
            cache,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency: Currency::default(),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Open a store wired to the REST catalog and the configured storage.
    pub fn from_config(config: &CartConfig) -> Result<Self, CartError> {
        let client = FetchClient::new()
            .with_base_url(config.api.base_url.as_str())
            .with_timeout(config.timeout());
        let catalog = Arc::new(HttpCatalog::new(client));

        let cache = match &config.storage.path {
            Some(path) => Cache::open_file(path)?,
            None => Cache::in_memory(),
        };

        Self::builder(catalog.clone(), catalog, cache)
            .storage_key(config.storage.key.as_str())
            .currency(config.currency)
            .open()
    }

    /// The current snapshot.
    pub fn cart(&self) -> Cart {
        self.inner.snapshot.borrow().clone()
    }

    /// Receive every snapshot published after a successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.snapshot.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart enters with amount 1 and display fields
    /// from the catalog. Otherwise its amount is incremented. Either way the
    /// resulting amount must not exceed current stock.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let result = self.try_add(product_id).await;
        self.report(CartOp::Add, product_id, result)
    }

    /// Remove a product entirely.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let result = self.try_remove(product_id).await;
        self.report(CartOp::Remove, product_id, result)
    }

    /// Set a product's amount.
    ///
    /// An amount of zero or less is ignored and returns the current cart
    /// without touching the services or storage.
    #[instrument(skip_all, fields(product_id = %product_id, amount = amount))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Cart, CartError> {
        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(self.cart());
        }
        let result = self.try_update(product_id, amount).await;
        self.report(CartOp::Update, product_id, result)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let _guard = self.inner.op_lock.lock().await;
        let current = self.cart();
        let stock = self.inner.stock.stock(product_id).await?;

        let next = match current.get(product_id) {
            Some(entry) => {
                let amount = ensure_stock(product_id, i64::from(entry.amount) + 1, &stock)?;
                current.with_replaced(entry.with_amount(amount))
            }
            None => {
                let amount = ensure_stock(product_id, 1, &stock)?;
                let details = self.inner.catalog.product(product_id).await?;
                let entry =
                    CartEntry::from_product(product_id, &details, amount, self.inner.currency);
                current.with_appended(entry)
            }
        };

        self.commit(next)
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let _guard = self.inner.op_lock.lock().await;
        let next = self
            .cart()
            .without(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        self.commit(next)
    }

    async fn try_update(&self, product_id: ProductId, amount: i64) -> Result<Cart, CartError> {
        let _guard = self.inner.op_lock.lock().await;
        let current = self.cart();
        let entry = current
            .get(product_id)
            .ok_or(CartError::NotFound(product_id))?;

        let stock = self.inner.stock.stock(product_id).await?;
        let amount = ensure_stock(product_id, amount, &stock)?;

        let next = current.with_replaced(entry.with_amount(amount));
        self.commit(next)
    }

    /// Persist, then publish. Nothing is published if the write fails.
    fn commit(&self, next: Cart) -> Result<Cart, CartError> {
        self.inner.cache.set(&self.inner.storage_key, &next)?;
        self.inner.snapshot.send_replace(next.clone());
        info!(
            items = next.len(),
            total_amount = next.total_amount(),
            "Cart updated"
        );
        Ok(next)
    }

    fn report(
        &self,
        op: CartOp,
        product_id: ProductId,
        result: Result<Cart, CartError>,
    ) -> Result<Cart, CartError> {
        if let Err(err) = &result {
            debug!(op = %op, error = %err, "Cart operation failed");
            self.inner
                .notifier
                .notify(&Warning::from_error(op, product_id, err));
        }
        result
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.inner.storage_key)
            .field("currency", &self.inner.currency)
            .field("cart", &*self.inner.snapshot.borrow())
            .finish_non_exhaustive()
    }
}
