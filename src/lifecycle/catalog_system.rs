use crate::config::CatalogConfig;
use crate::docstore::CounterActor;
use crate::sequence::SequenceGenerator;
use crate::services::{ProductService, ReviewService};
use crate::versioned::VersionedStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator for the catalog.
///
/// `CatalogSystem` spawns the counter actor and one collection actor per entity kind,
/// wires them into the sequence generator and the services, and shuts them down again.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::with_config(&CatalogConfig::from_env()?)?;
///
/// let cup = system.products.create(ProductDraft::new("Cup-1", 38000)).await?;
/// let review = system.reviews.create(ReviewDraft::new(cup.product_id.unwrap(), "ann")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    pub products: ProductService,
    pub reviews: ReviewService,
    pub sequence: SequenceGenerator,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CatalogSystem {
    /// Starts the catalog with default configuration. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        Self::start(CatalogConfig::default().mailbox_capacity)
    }

    /// Starts the catalog after validating `config`. Nothing is spawned on error.
    pub fn with_config(config: &CatalogConfig) -> Result<Self> {
        config.validate().context("invalid catalog configuration")?;
        Ok(Self::start(config.mailbox_capacity))
    }

    fn start(capacity: usize) -> Self {
        let (counter_actor, counters) = CounterActor::new(capacity);
        let (product_actor, products) = crate::product::new(capacity);
        let (review_actor, reviews) = crate::review::new(capacity);

        let handles = vec![
            tokio::spawn(counter_actor.run()),
            tokio::spawn(product_actor.run()),
            tokio::spawn(review_actor.run()),
        ];

        let sequence = SequenceGenerator::new(Arc::new(counters));
        let reviews = ReviewService::new(VersionedStore::new(Arc::new(reviews), sequence.clone()));
        let products = ProductService::new(
            VersionedStore::new(Arc::new(products), sequence.clone()),
            reviews.clone(),
        );

        info!(capacity, "Catalog started");
        Self {
            products,
            reviews,
            sequence,
            handles,
        }
    }

    /// Gracefully shuts down every actor.
    ///
    /// Dropping the services closes the actors' channels; each actor drains what is
    /// already queued and exits. Clones of the services held elsewhere keep their
    /// actors alive, so drop those first.
    ///
    /// Returns `Err` if any actor task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");

        drop(self.products);
        drop(self.reviews);
        drop(self.sequence);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}

impl Default for CatalogSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductDraft;
    use crate::services::EntityService;

    #[tokio::test]
    async fn test_start_use_and_shutdown() {
        let system = CatalogSystem::with_config(&CatalogConfig {
            mailbox_capacity: 4,
            ..Default::default()
        })
        .unwrap();

        let created = system.products.create(ProductDraft::new("Cup-1", 1)).await.unwrap();
        assert_eq!(created.product_id.map(|id| id.value()), Some(1));
        assert_eq!(system.sequence.current("_product_sequence").await.unwrap(), Some(1));

        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_capacity_is_rejected_before_spawning() {
        let result = CatalogSystem::with_config(&CatalogConfig {
            mailbox_capacity: 0,
            ..Default::default()
        });
        let err = result.err().expect("zero capacity must be rejected");
        assert!(format!("{:#}", err).contains("mailbox capacity must be at least 1"));
    }
}
