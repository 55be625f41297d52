//! # Versioned Entity Store
//!
//! Create / read / update / delete / list for any [`CatalogEntity`], on top of a
//! [`DocumentStore`] and the [`SequenceGenerator`].
//!
//! ## Identity assignment
//!
//! `create` reserves the business id first and then inserts the complete document, so
//! the id is part of the very first visible write. The two steps are separate store
//! calls with no transaction around them: if the insert fails, the reserved counter
//! value is simply never used. Ids are never handed out twice, and deleted ids are not
//! reclaimed.
//!
//! ## Optimistic locking
//!
//! `update_with_optimistic_lock` is a single conditional replace keyed by business id
//! *and* expected version. Losing a race (or targeting a deleted entity) yields
//! [`CatalogError::OptimisticLockConflict`]; the store never retries or merges.

use crate::docstore::{DocumentMeta, DocumentStore, Filter, StoreError, Version};
use crate::error::{CatalogError, CatalogResult};
use crate::sequence::SequenceGenerator;
use crate::versioned::entity::{CatalogEntity, UpsertTarget};
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generic versioned store for one entity kind.
pub struct VersionedStore<K: CatalogEntity> {
    docs: Arc<dyn DocumentStore<K>>,
    sequence: SequenceGenerator,
}

impl<K: CatalogEntity> Clone for VersionedStore<K> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
            sequence: self.sequence.clone(),
        }
    }
}

impl<K: CatalogEntity> VersionedStore<K> {
    pub fn new(docs: Arc<dyn DocumentStore<K>>, sequence: SequenceGenerator) -> Self {
        Self { docs, sequence }
    }

    /// Assign a fresh internal id and business id, then insert at the initial version.
    #[instrument(skip(self), fields(kind = K::COLLECTION))]
    pub async fn create(&self, draft: K::Draft) -> CatalogResult<K> {
        let business_id = K::BusinessId::from(self.sequence.next(K::COUNTER).await?);
        let entity = K::from_draft(DocumentMeta::fresh(), business_id, draft);

        match self.docs.insert(entity).await {
            Ok(created) => {
                info!(%business_id, "Created");
                Ok(created)
            }
            Err(e) => {
                // The reserved id stays consumed.
                warn!(%business_id, error = %e, "Insert failed after id reservation");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self), fields(kind = K::COLLECTION))]
    pub async fn get_by_business_id(&self, id: K::BusinessId) -> CatalogResult<K> {
        self.docs
            .find_one(Filter::Matching(K::by_business_id(id)))
            .await
            .map_err(|e| not_found_as::<K>(e, id))
    }

    /// Lazily stream the entities matching a kind-specific query.
    pub fn find(&self, query: K::Query) -> BoxStream<'static, CatalogResult<K>> {
        self.docs
            .find_many(Filter::Matching(query))
            .map_err(CatalogError::from)
            .boxed()
    }

    /// Lazily stream every entity in store order. Re-invoke to start over.
    pub fn list_all(&self) -> BoxStream<'static, CatalogResult<K>> {
        self.docs
            .find_many(Filter::All)
            .map_err(CatalogError::from)
            .boxed()
    }

    pub async fn count(&self) -> CatalogResult<usize> {
        Ok(self.docs.count(Filter::All).await?)
    }

    /// Apply `patch` only if the entity is still at `expected`; returns the new state.
    #[instrument(skip(self, patch), fields(kind = K::COLLECTION))]
    pub async fn update_with_optimistic_lock(
        &self,
        id: K::BusinessId,
        expected: Version,
        patch: K::Patch,
    ) -> CatalogResult<K> {
        debug!(?patch, "Conditional update");
        match self
            .docs
            .conditional_replace(Filter::Matching(K::by_business_id(id)), expected, patch)
            .await
        {
            Ok(updated) => {
                info!(version = %updated.meta().version, "Updated");
                Ok(updated)
            }
            Err(StoreError::NotFound { .. }) => {
                warn!("Version check failed");
                Err(CatalogError::OptimisticLockConflict {
                    kind: K::COLLECTION,
                    business_id: id.into(),
                    expected: expected.value(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update when the write names a business id, otherwise create.
    pub async fn upsert(&self, write: K::View) -> CatalogResult<K> {
        match K::classify(write) {
            UpsertTarget::Existing {
                business_id,
                expected,
                patch,
            } => self.update_with_optimistic_lock(business_id, expected, patch).await,
            UpsertTarget::Fresh(draft) => {
                debug!(kind = K::COLLECTION, "No business id supplied, creating");
                self.create(draft).await
            }
        }
    }

    /// Remove the entity permanently and return its (now retired) business id.
    #[instrument(skip(self), fields(kind = K::COLLECTION))]
    pub async fn delete(&self, id: K::BusinessId) -> CatalogResult<K::BusinessId> {
        let removed = self
            .docs
            .delete_one(Filter::Matching(K::by_business_id(id)))
            .await
            .map_err(|e| not_found_as::<K>(e, id))?;
        info!("Deleted");
        Ok(removed.business_id())
    }
}

fn not_found_as<K: CatalogEntity>(err: StoreError, id: K::BusinessId) -> CatalogError {
    match err {
        StoreError::NotFound { .. } => CatalogError::NotFound {
            kind: K::COLLECTION,
            id: id.to_string(),
        },
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstore::mock::{create_mock_collection, expect_replace, MockCollection, MockCounter};
    use crate::docstore::{CounterActor, StoreRequest};
    use crate::model::{
        Product, ProductDraft, ProductEntity, ProductId, ProductPatch, ProductQuery, ReviewDraft,
        ReviewEntity, ReviewQuery,
    };

    fn sequence() -> SequenceGenerator {
        let (actor, counters) = CounterActor::new(8);
        tokio::spawn(actor.run());
        SequenceGenerator::new(Arc::new(counters))
    }

    fn products() -> VersionedStore<ProductEntity> {
        let (actor, client) = crate::product::new(8);
        tokio::spawn(actor.run());
        VersionedStore::new(Arc::new(client), sequence())
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_initial_version() {
        let store = products();

        let a = store.create(ProductDraft::new("Cup-1", 38000)).await.unwrap();
        let b = store.create(ProductDraft::new("Cup-2", 41000)).await.unwrap();

        assert_eq!(a.product_id, ProductId(1));
        assert_eq!(b.product_id, ProductId(2));
        assert_eq!(a.meta.version, Version::INITIAL);
        assert_ne!(a.meta.internal_id, b.meta.internal_id);
        assert_eq!(a.meta.audit.created_at, a.meta.audit.modified_at);
    }

    #[tokio::test]
    async fn test_update_advances_version_and_rejects_stale() {
        let store = products();
        let created = store.create(ProductDraft::new("Cup-1", 38000)).await.unwrap();
        let patch = || ProductPatch { name: "Cup-1b".into(), cost: 39000 };

        let updated = store
            .update_with_optimistic_lock(created.product_id, Version::INITIAL, patch())
            .await
            .unwrap();
        assert_eq!(updated.meta.version, Version::from_value(1));
        assert_eq!(updated.meta.internal_id, created.meta.internal_id);
        assert_eq!(updated.meta.audit.created_at, created.meta.audit.created_at);

        let stale = store
            .update_with_optimistic_lock(created.product_id, Version::INITIAL, patch())
            .await
            .unwrap_err();
        assert_eq!(
            stale,
            CatalogError::OptimisticLockConflict { kind: "products", business_id: 1, expected: 0 }
        );

        let current = store.get_by_business_id(created.product_id).await.unwrap();
        assert_eq!(current.meta.version, Version::from_value(1));
        assert_eq!(current.name, "Cup-1b");
    }

    #[tokio::test]
    async fn test_update_of_missing_entity_is_a_lock_conflict() {
        let store = products();
        let err = store
            .update_with_optimistic_lock(
                ProductId(42),
                Version::INITIAL,
                ProductPatch { name: "x".into(), cost: 1 },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::OptimisticLockConflict { business_id: 42, .. }));
    }

    #[tokio::test]
    async fn test_upsert_without_id_creates() {
        let store = products();
        let created = store.upsert(Product::new("Cup-1", 38000)).await.unwrap();
        assert_eq!(created.product_id, ProductId(1));

        let mut write = created.to_view();
        write.cost = 1;
        let updated = store.upsert(write).await.unwrap();
        assert_eq!(updated.product_id, ProductId(1));
        assert_eq!(updated.cost, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_read_is_not_found() {
        let store = products();
        let created = store.create(ProductDraft::new("Cup-1", 38000)).await.unwrap();

        assert_eq!(store.delete(created.product_id).await.unwrap(), ProductId(1));
        assert_eq!(
            store.get_by_business_id(ProductId(1)).await.unwrap_err(),
            CatalogError::NotFound { kind: "products", id: "1".into() }
        );
        assert!(matches!(
            store.delete(ProductId(1)).await,
            Err(CatalogError::NotFound { .. })
        ));

        let next = store.create(ProductDraft::new("Cup-2", 1)).await.unwrap();
        assert_eq!(next.product_id, ProductId(2));
    }

    #[tokio::test]
    async fn test_list_all_is_lazy_and_restartable() {
        let (client, mut requests) = create_mock_collection::<ProductEntity>(4);
        let store = VersionedStore::new(Arc::new(client), sequence());
        let entity = ProductEntity::from_draft(
            DocumentMeta::fresh(),
            ProductId(1),
            ProductDraft::new("Cup-1", 1),
        );

        let pending = store.list_all();
        tokio::task::yield_now().await;
        assert!(requests.try_recv().is_err(), "query issued before first poll");

        for _ in 0..2 {
            let stream = store.list_all();
            let collect = tokio::spawn(async move { stream.try_collect::<Vec<_>>().await });
            match requests.recv().await {
                Some(StoreRequest::FindMany { filter: Filter::All, respond_to }) => {
                    let _ = respond_to.send(Ok(vec![entity.clone()]));
                }
                other => panic!("unexpected request: {:?}", other),
            }
            assert_eq!(collect.await.unwrap().unwrap(), vec![entity.clone()]);
        }
        drop(pending);
    }

    #[tokio::test]
    async fn test_find_reviews_by_product() {
        let (actor, client) = crate::review::new(8);
        tokio::spawn(actor.run());
        let store: VersionedStore<ReviewEntity> = VersionedStore::new(Arc::new(client), sequence());

        store.create(ReviewDraft::new(ProductId(1), "ann")).await.unwrap();
        store.create(ReviewDraft::new(ProductId(2), "bob")).await.unwrap();
        store.create(ReviewDraft::new(ProductId(1), "cy")).await.unwrap();

        let authors: Vec<String> = store
            .find(ReviewQuery::ByProduct(ProductId(1)))
            .map_ok(|r| r.author)
            .try_collect()
            .await
            .unwrap();
        assert_eq!(authors, vec!["ann", "cy"]);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_reserved_id_unused() {
        let counter = MockCounter::new();
        counter.expect_next(1);
        counter.expect_next(2);
        let mock = MockCollection::<ProductEntity>::new();
        mock.expect_insert()
            .return_err(StoreError::Unavailable("write timed out".into()));

        let store = VersionedStore::new(
            Arc::new(mock.client()),
            SequenceGenerator::new(Arc::new(counter.client())),
        );
        let err = store.create(ProductDraft::new("Cup-1", 1)).await.unwrap_err();
        assert_eq!(err, CatalogError::StoreUnavailable("write timed out".into()));

        let sent = ProductEntity::from_draft(
            DocumentMeta::fresh(),
            ProductId(2),
            ProductDraft::new("Cup-2", 2),
        );
        mock.expect_insert().return_ok(sent);
        let created = store.create(ProductDraft::new("Cup-2", 2)).await.unwrap();
        assert_eq!(created.product_id, ProductId(2));

        counter.verify();
        mock.verify();
    }

    fn mocked_products(mock: &MockCollection<ProductEntity>) -> VersionedStore<ProductEntity> {
        VersionedStore::new(Arc::new(mock.client()), sequence())
    }

    fn patch() -> ProductPatch {
        ProductPatch { name: "Cup-1b".into(), cost: 2 }
    }

    #[tokio::test]
    async fn test_store_failure_during_update_is_not_a_lock_conflict() {
        let mock = MockCollection::<ProductEntity>::new();
        mock.expect_replace()
            .return_err(StoreError::Unavailable("connection reset".into()));
        let store = mocked_products(&mock);

        let err = store
            .update_with_optimistic_lock(ProductId(1), Version::INITIAL, patch())
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::StoreUnavailable("connection reset".into()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_store_failure_during_delete_propagates() {
        let mock = MockCollection::<ProductEntity>::new();
        mock.expect_delete()
            .return_err(StoreError::Unavailable("connection reset".into()));
        let store = mocked_products(&mock);

        assert_eq!(
            store.delete(ProductId(1)).await.unwrap_err(),
            CatalogError::StoreUnavailable("connection reset".into())
        );
        mock.verify();
    }

    #[tokio::test]
    async fn test_count_reports_store_answer_and_failure() {
        let mock = MockCollection::<ProductEntity>::new();
        mock.expect_count().return_ok(3);
        mock.expect_count()
            .return_err(StoreError::Unavailable("connection reset".into()));
        let store = mocked_products(&mock);

        assert_eq!(store.count().await.unwrap(), 3);
        assert!(matches!(store.count().await, Err(CatalogError::StoreUnavailable(_))));
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_is_one_conditional_replace_on_id_and_version() {
        let (client, mut requests) = create_mock_collection::<ProductEntity>(4);
        let store = VersionedStore::new(Arc::new(client), sequence());

        let pending = tokio::spawn(async move {
            store
                .update_with_optimistic_lock(ProductId(4), Version::from_value(2), patch())
                .await
        });

        let (filter, expected, sent, respond_to) = expect_replace(&mut requests)
            .await
            .expect("expected a conditional replace");
        assert!(matches!(filter, Filter::Matching(ProductQuery::ById(ProductId(4)))));
        assert_eq!(expected, Version::from_value(2));
        assert_eq!(sent, patch());

        let mut stored = ProductEntity::from_draft(
            DocumentMeta::fresh(),
            ProductId(4),
            ProductDraft::new("Cup-1b", 2),
        );
        stored.meta.version = Version::from_value(3);
        let _ = respond_to.send(Ok(stored.clone()));

        assert_eq!(pending.await.unwrap().unwrap(), stored);
        assert!(requests.try_recv().is_err(), "update must not retry");
    }

    #[tokio::test]
    async fn test_forced_duplicate_product_id_is_a_conflict() {
        let counter = MockCounter::new();
        counter.expect_next(1);
        counter.expect_next(1);
        let (actor, client) = crate::product::new(8);
        tokio::spawn(actor.run());
        let store: VersionedStore<ProductEntity> =
            VersionedStore::new(Arc::new(client), SequenceGenerator::new(Arc::new(counter.client())));

        store.create(ProductDraft::new("Cup-1", 1)).await.unwrap();
        let err = store.create(ProductDraft::new("Cup-2", 2)).await.unwrap_err();

        assert!(matches!(err, CatalogError::Conflict { kind: "products", .. }));
        assert_eq!(store.count().await.unwrap(), 1);
        counter.verify();
    }
}
