use anyhow::{Context, Result};
use catalog_store::config::CatalogConfig;
use catalog_store::lifecycle::{setup_tracing, CatalogSystem};
use catalog_store::model::{ProductDraft, ReviewDraft};
use catalog_store::services::EntityService;
use catalog_store::CatalogError;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<()> {
    let config = CatalogConfig::from_env().context("failed to load configuration")?;
    setup_tracing(&config.log_filter);

    info!("Starting catalog demo");
    let system = CatalogSystem::with_config(&config)?;

    let span = tracing::info_span!("product_creation");
    let cup = async {
        info!("Creating product");
        system.products.create(ProductDraft::new("Cup-1", 38000)).await
    }
    .instrument(span)
    .await?;
    let product_id = cup.product_id.context("created product has no id")?;
    info!(%product_id, "Product created");

    let span = tracing::info_span!("review_creation");
    async {
        for (author, rating) in [("ann", 4.5), ("bob", 3.0)] {
            system
                .reviews
                .create(ReviewDraft::new(product_id, author).with_rating(rating))
                .await?;
        }
        Ok::<_, CatalogError>(())
    }
    .instrument(span)
    .await?;

    // Two writers start from the same version; only the first one lands.
    let mut first = cup.clone();
    first.cost = 36000;
    let mut second = cup;
    second.name = "Cup-1 (blue)".to_string();

    let updated = system.products.update(first).await?;
    info!(version = %updated.version, cost = updated.cost, "First writer won");
    match system.products.update(second).await {
        Err(e @ CatalogError::OptimisticLockConflict { .. }) => warn!(error = %e, "Second writer rejected"),
        other => warn!(?other, "Unexpected result for stale write"),
    }

    let details = system.products.details(product_id).await?;
    info!(
        name = %details.product.name,
        reviews = details.reviews.len(),
        "Product details"
    );

    let retired = system.products.delete(product_id).await?;
    let next = system.products.create(ProductDraft::new("Cup-2", 41000)).await?;
    info!(%retired, next = ?next.product_id, "Deleted ids are not reused");

    system
        .shutdown()
        .await
        .map_err(anyhow::Error::msg)
        .context("catalog did not shut down cleanly")?;

    info!("Demo completed successfully");
    Ok(())
}
