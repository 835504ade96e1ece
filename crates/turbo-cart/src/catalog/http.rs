//! REST implementation of the catalog services.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use turbo_data::FetchClient;

use crate::catalog::{ProductCatalog, ProductDetails, StockRecord, StockService};
use crate::error::CatalogError;
use crate::ids::ProductId;

/// Catalog backed by the storefront REST API.
///
/// Serves `GET /stock/{id}` and `GET /products/{id}` relative to the
/// client's base URL. A 404 means the product does not exist; every other
/// failure is reported as [`CatalogError::Fetch`].
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: FetchClient,
}

impl HttpCatalog {
    /// Create a catalog using a configured fetch client.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: String,
        product_id: ProductId,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(path)
            .accept("application/json")
            .send()
            .await?;

        if response.is_not_found() {
            debug!("Product unknown to catalog");
            return Err(CatalogError::UnknownProduct(product_id));
        }

        Ok(response.error_for_status()?.json()?)
    }
}

#[async_trait]
impl StockService for HttpCatalog {
    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError> {
        self.fetch(format!("/stock/{}", product_id), product_id).await
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError> {
        self.fetch(format!("/products/{}", product_id), product_id).await
    }
}
