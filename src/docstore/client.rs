//! # Collection Client
//!
//! The cheap, cloneable handle callers use to reach a [`CollectionActor`](crate::docstore::CollectionActor).

use crate::docstore::document::{Document, Filter, Version};
use crate::docstore::error::StoreError;
use crate::docstore::message::StoreRequest;
use crate::docstore::store::DocumentStore;
use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for one collection.
///
/// Holds only a sender, so clones are inexpensive and can be shared across tasks.
/// A closed channel or a dropped reply surfaces as [`StoreError::Unavailable`].
pub struct CollectionClient<D: Document> {
    sender: mpsc::Sender<StoreRequest<D>>,
}

impl<D: Document> Clone for CollectionClient<D> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<D: Document> CollectionClient<D> {
    pub fn new(sender: mpsc::Sender<StoreRequest<D>>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest<D>,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Unavailable(format!("{} actor closed", D::COLLECTION)))?;
        response
            .await
            .map_err(|_| StoreError::Unavailable(format!("{} actor dropped response", D::COLLECTION)))?
    }

    async fn snapshot(&self, filter: Filter<D::Query>) -> Result<Vec<D>, StoreError> {
        self.request(|respond_to| StoreRequest::FindMany { filter, respond_to })
            .await
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for CollectionClient<D> {
    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        self.request(|respond_to| StoreRequest::Insert { doc, respond_to })
            .await
    }

    async fn find_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError> {
        self.request(|respond_to| StoreRequest::FindOne { filter, respond_to })
            .await
    }

    fn find_many(&self, filter: Filter<D::Query>) -> BoxStream<'static, Result<D, StoreError>> {
        let client = self.clone();
        stream::once(async move { client.snapshot(filter).await })
            .map_ok(|docs| stream::iter(docs.into_iter().map(Ok::<D, StoreError>)))
            .try_flatten()
            .boxed()
    }

    async fn count(&self, filter: Filter<D::Query>) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::Count { filter, respond_to })
            .await
    }

    async fn conditional_replace(
        &self,
        filter: Filter<D::Query>,
        expected: Version,
        patch: D::Patch,
    ) -> Result<D, StoreError> {
        self.request(|respond_to| StoreRequest::ConditionalReplace {
            filter,
            expected,
            patch,
            respond_to,
        })
        .await
    }

    async fn delete_one(&self, filter: Filter<D::Query>) -> Result<D, StoreError> {
        self.request(|respond_to| StoreRequest::DeleteOne { filter, respond_to })
            .await
    }
}
