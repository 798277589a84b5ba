use tracing::{debug, instrument};
use uuid::Uuid;

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductBatchUpdate, ProductInput, ProductQuery};
use crate::product_actor::ProductError;

/// Client for interacting with the Product actor.
///
/// Singular operations are strict and report [`ProductError::NotFound`];
/// batch operations skip missing ids and return only what they touched.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, Uuid, ProductError, product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, input: ProductInput) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.create(input).await.map_err(ProductError::from)
    }

    /// Fails without inserting anything if any input is invalid.
    #[instrument(skip(self, inputs), fields(count = inputs.len()))]
    pub async fn create_products(&self, inputs: Vec<ProductInput>) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner.create_many(inputs).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn query_products(&self, query: ProductQuery) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner.query(query).await.map_err(ProductError::from)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        self.query_products(ProductQuery::default()).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: ProductInput) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, input).await.map_err(ProductError::for_id(id))
    }

    /// Returns the ids that were updated; unknown ids and invalid items are skipped.
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn update_products(&self, items: Vec<ProductBatchUpdate>) -> Result<Vec<Uuid>, ProductError> {
        debug!("Sending request");
        let updates = items.into_iter().map(|item| (item.id, item.input)).collect();
        self.inner.update_many(updates).await.map_err(ProductError::from)
    }
}
