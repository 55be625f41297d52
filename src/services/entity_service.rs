use crate::error::CatalogResult;
use crate::versioned::{CatalogEntity, VersionedStore};
use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};

/// Trait for entity services to inherit the standard CRUD operations.
///
/// Implementors only provide access to their store; everything else is shared.
/// Results are returned as caller-facing views.
#[async_trait]
pub trait EntityService<K: CatalogEntity>: Send + Sync {
    /// Access the versioned store for this kind.
    fn store(&self) -> &VersionedStore<K>;

    /// Create a new entity. Any business id on the caller's side is ignored.
    #[tracing::instrument(skip(self), fields(kind = K::COLLECTION))]
    async fn create(&self, draft: K::Draft) -> CatalogResult<K::View> {
        tracing::debug!("Sending request");
        Ok(self.store().create(draft).await?.view())
    }

    /// Update at the view's version, or create when it carries no business id.
    #[tracing::instrument(skip(self), fields(kind = K::COLLECTION))]
    async fn update(&self, view: K::View) -> CatalogResult<K::View> {
        tracing::debug!("Sending request");
        Ok(self.store().upsert(view).await?.view())
    }

    /// Delete by business id, returning the retired id.
    #[tracing::instrument(skip(self), fields(kind = K::COLLECTION))]
    async fn delete(&self, id: K::BusinessId) -> CatalogResult<K::BusinessId> {
        tracing::debug!("Sending request");
        self.store().delete(id).await
    }

    /// Lazily stream every entity of this kind.
    fn list_all(&self) -> BoxStream<'static, CatalogResult<K::View>> {
        self.store().list_all().map_ok(|entity| entity.view()).boxed()
    }
}
