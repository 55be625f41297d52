//! # Store Capabilities
//!
//! The abstract capability set the catalog core consumes. The in-process actors
//! implement it through their clients; any other backend only needs these two traits.

use crate::docstore::document::{Document, Filter, Version};
use crate::docstore::error::StoreError;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::sync::Arc;

/// Per-collection document primitives. Each call is atomic on a single document.
#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Insert a new document; `Conflict` if its unique key or internal id already exists.
    async fn insert(&self, doc: D) -> Result<D, StoreError>;

    async fn find_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError>;

    /// Lazily stream every matching document in store order.
    ///
    /// Nothing is read until the stream is first polled.
    fn find_many(&self, filter: Filter<D::Query>) -> BoxStream<'static, Result<D, StoreError>>;

    async fn count(&self, filter: Filter<D::Query>) -> Result<usize, StoreError>;

    /// Apply `patch` to the document matching `filter` whose version is `expected`,
    /// advance its version and return the new state. `NotFound` if no such document.
    async fn conditional_replace(
        &self,
        filter: Filter<D::Query>,
        expected: Version,
        patch: D::Patch,
    ) -> Result<D, StoreError>;

    async fn delete_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError>;
}

/// Named monotonic counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Atomically add one to `name` (creating it at 1) and return the new value.
    async fn increment_or_create(&self, name: &str) -> Result<u64, StoreError>;

    /// Current value of `name`, or `None` if it was never incremented.
    async fn current(&self, name: &str) -> Result<Option<u64>, StoreError>;
}

#[async_trait]
impl<D, T> DocumentStore<D> for Arc<T>
where
    D: Document,
    T: DocumentStore<D> + ?Sized,
{
    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        (**self).insert(doc).await
    }

    async fn find_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError> {
        (**self).find_one(filter).await
    }

    fn find_many(&self, filter: Filter<D::Query>) -> BoxStream<'static, Result<D, StoreError>> {
        (**self).find_many(filter)
    }

    async fn count(&self, filter: Filter<D::Query>) -> Result<usize, StoreError> {
        (**self).count(filter).await
    }

    async fn conditional_replace(
        &self,
        filter: Filter<D::Query>,
        expected: Version,
        patch: D::Patch,
    ) -> Result<D, StoreError> {
        (**self).conditional_replace(filter, expected, patch).await
    }

    async fn delete_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError> {
        (**self).delete_one(filter).await
    }
}

#[async_trait]
impl<T> CounterStore for Arc<T>
where
    T: CounterStore + ?Sized,
{
    async fn increment_or_create(&self, name: &str) -> Result<u64, StoreError> {
        (**self).increment_or_create(name).await
    }

    async fn current(&self, name: &str) -> Result<Option<u64>, StoreError> {
        (**self).current(name).await
    }
}
