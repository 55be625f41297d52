use crate::error::CatalogResult;
use crate::model::{Product, ProductDetails, ProductEntity, ProductId};
use crate::services::{EntityService, ReviewService};
use crate::versioned::VersionedStore;
use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use tracing::{debug, instrument};

/// Products, plus read-time assembly of a product with its reviews.
#[derive(Clone)]
pub struct ProductService {
    store: VersionedStore<ProductEntity>,
    reviews: ReviewService,
}

impl ProductService {
    pub fn new(store: VersionedStore<ProductEntity>, reviews: ReviewService) -> Self {
        Self { store, reviews }
    }

    #[instrument(skip(self))]
    pub async fn read(&self, product_id: ProductId) -> CatalogResult<Product> {
        Ok(self.store.get_by_business_id(product_id).await?.to_view())
    }

    /// The product and its current reviews. Reviews are fetched on every call and
    /// never stored on the product.
    #[instrument(skip(self))]
    pub async fn details(&self, product_id: ProductId) -> CatalogResult<ProductDetails> {
        let product = self.read(product_id).await?;
        let reviews: Vec<_> = self.reviews.read(product_id).try_collect().await?;
        debug!(reviews = reviews.len(), "Assembled product details");
        Ok(ProductDetails { product, reviews })
    }
}

#[async_trait]
impl EntityService<ProductEntity> for ProductService {
    fn store(&self) -> &VersionedStore<ProductEntity> {
        &self.store
    }
}
