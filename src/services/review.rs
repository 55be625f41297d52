use crate::error::CatalogResult;
use crate::model::{ProductId, Review, ReviewEntity, ReviewId, ReviewQuery};
use crate::services::EntityService;
use crate::versioned::VersionedStore;
use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

/// Reviews are created under a product and read per product.
#[derive(Clone)]
pub struct ReviewService {
    store: VersionedStore<ReviewEntity>,
}

impl ReviewService {
    pub fn new(store: VersionedStore<ReviewEntity>) -> Self {
        Self { store }
    }

    /// All reviews of `product_id`, in store order. Nothing is fetched until polled;
    /// an unknown product simply yields nothing.
    #[instrument(skip(self))]
    pub fn read(&self, product_id: ProductId) -> BoxStream<'static, CatalogResult<Review>> {
        debug!("Streaming reviews");
        self.store
            .find(ReviewQuery::ByProduct(product_id))
            .map_ok(|review| review.to_view())
            .boxed()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, review_id: ReviewId) -> CatalogResult<Review> {
        Ok(self.store.get_by_business_id(review_id).await?.to_view())
    }
}

#[async_trait]
impl EntityService<ReviewEntity> for ReviewService {
    fn store(&self) -> &VersionedStore<ReviewEntity> {
        &self.store
    }
}
