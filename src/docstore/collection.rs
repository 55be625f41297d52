//! # Collection Actor
//!
//! This module defines the `CollectionActor`, the server side of one document
//! collection. It owns every document of the collection and the collection's unique
//! index, and processes requests sequentially, so each request is an atomic
//! read-modify-write against a consistent view of the data.

use crate::docstore::client::CollectionClient;
use crate::docstore::document::{Audit, Document, Filter, Version};
use crate::docstore::error::StoreError;
use crate::docstore::message::StoreRequest;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The actor that owns one collection of documents.
///
/// **Concurrency Model**:
/// Any number of `CollectionClient` clones may send requests concurrently; the actor
/// handles them one at a time in arrival order. No `Mutex` is needed for the
/// documents, and two requests on the same collection are never interleaved.
///
/// **Cancellation**:
/// Once a request has been received it runs to completion even if the caller has
/// stopped waiting for the reply. A dropped caller never rolls back a committed write.
///
/// ## Operations
///
/// * **Insert**: rejects a duplicate internal id or unique key with `Conflict`, otherwise
///   stores the document at [`Version::INITIAL`] with both audit times set to now.
/// * **FindOne / FindMany / Count**: read-only scans in insertion order.
/// * **ConditionalReplace**: finds the first document matching the filter *and* the
///   expected version, applies the patch, advances the version by one and touches
///   `modified_at`. If nothing matches, `NotFound`.
/// * **DeleteOne**: removes the first matching document and frees its index entry.
pub struct CollectionActor<D: Document> {
    receiver: mpsc::Receiver<StoreRequest<D>>,
    docs: HashMap<Uuid, D>,
    // Insertion order; the "store-native" order of scans.
    order: Vec<Uuid>,
    unique: HashMap<D::Key, Uuid>,
}

impl<D: Document> CollectionActor<D> {
    /// Creates a new `CollectionActor` and its associated `CollectionClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client
    /// calls wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<D>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            docs: HashMap::new(),
            order: Vec::new(),
            unique: HashMap::new(),
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the actor's event loop, processing requests until every client is dropped.
    pub async fn run(mut self) {
        let collection = D::COLLECTION;
        info!(collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Insert { doc, respond_to } => {
                    debug!(collection, id = %doc.meta().internal_id, "Insert");
                    let result = self.insert(doc);
                    match &result {
                        Ok(doc) => info!(
                            collection,
                            id = %doc.meta().internal_id,
                            size = self.docs.len(),
                            "Inserted"
                        ),
                        Err(e) => warn!(collection, error = %e, "Insert rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::FindOne { filter, respond_to } => {
                    let found = self.position(&filter, None).map(|id| self.docs[&id].clone());
                    debug!(collection, %filter, found = found.is_some(), "FindOne");
                    let _ = respond_to.send(found.ok_or_else(|| not_found::<D>(&filter)));
                }
                StoreRequest::FindMany { filter, respond_to } => {
                    let docs = self.scan(&filter);
                    debug!(collection, %filter, count = docs.len(), "FindMany");
                    let _ = respond_to.send(Ok(docs));
                }
                StoreRequest::Count { filter, respond_to } => {
                    let count = self.order.iter().filter(|id| filter.selects(&self.docs[*id])).count();
                    debug!(collection, %filter, count, "Count");
                    let _ = respond_to.send(Ok(count));
                }
                StoreRequest::ConditionalReplace {
                    filter,
                    expected,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %filter, %expected, ?patch, "ConditionalReplace");
                    let result = self.replace(&filter, expected, patch);
                    match &result {
                        Ok(doc) => info!(
                            collection,
                            id = %doc.meta().internal_id,
                            version = %doc.meta().version,
                            "Replaced"
                        ),
                        Err(e) => warn!(collection, %expected, error = %e, "Replace rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::DeleteOne { filter, respond_to } => {
                    debug!(collection, %filter, "DeleteOne");
                    let result = self.delete(&filter);
                    match &result {
                        Ok(doc) => info!(
                            collection,
                            id = %doc.meta().internal_id,
                            size = self.docs.len(),
                            "Deleted"
                        ),
                        Err(e) => warn!(collection, error = %e, "Delete rejected"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(collection, size = self.docs.len(), "Shutdown");
    }

    fn insert(&mut self, mut doc: D) -> Result<D, StoreError> {
        let id = doc.meta().internal_id;
        if self.docs.contains_key(&id) {
            return Err(conflict::<D>(format!("internal_id={}", id)));
        }
        let key = doc.unique_key();
        if self.unique.contains_key(&key) {
            return Err(conflict::<D>(format!("{:?}", key)));
        }

        let meta = doc.meta_mut();
        meta.version = Version::INITIAL;
        meta.audit = Audit::at(Utc::now());

        self.unique.insert(key, id);
        self.order.push(id);
        self.docs.insert(id, doc.clone());
        Ok(doc)
    }

    fn replace(
        &mut self,
        filter: &Filter<D::Query>,
        expected: Version,
        patch: D::Patch,
    ) -> Result<D, StoreError> {
        let id = self
            .position(filter, Some(expected))
            .ok_or_else(|| not_found::<D>(filter))?;

        let mut updated = self.docs[&id].clone();
        let old_key = updated.unique_key();
        updated.apply_patch(patch);
        let new_key = updated.unique_key();

        if new_key != old_key {
            if self.unique.contains_key(&new_key) {
                return Err(conflict::<D>(format!("{:?}", new_key)));
            }
            self.unique.remove(&old_key);
            self.unique.insert(new_key, id);
        }

        let meta = updated.meta_mut();
        meta.version = meta.version.next();
        meta.audit.touch(Utc::now());

        self.docs.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&mut self, filter: &Filter<D::Query>) -> Result<D, StoreError> {
        let id = self.position(filter, None).ok_or_else(|| not_found::<D>(filter))?;
        self.order.retain(|other| *other != id);
        let doc = self
            .docs
            .remove(&id)
            .ok_or_else(|| not_found::<D>(filter))?;
        self.unique.remove(&doc.unique_key());
        Ok(doc)
    }

    /// First document (in store order) selected by `filter`, optionally also
    /// requiring the given version.
    fn position(&self, filter: &Filter<D::Query>, version: Option<Version>) -> Option<Uuid> {
        if let Filter::InternalId(id) = filter {
            return self
                .docs
                .get(id)
                .filter(|doc| version.map_or(true, |v| doc.meta().version == v))
                .map(|_| *id);
        }
        self.order.iter().copied().find(|id| {
            let doc = &self.docs[id];
            filter.selects(doc) && version.map_or(true, |v| doc.meta().version == v)
        })
    }

    fn scan(&self, filter: &Filter<D::Query>) -> Vec<D> {
        self.order
            .iter()
            .map(|id| &self.docs[id])
            .filter(|doc| filter.selects(*doc))
            .cloned()
            .collect()
    }
}

fn not_found<D: Document>(filter: &Filter<D::Query>) -> StoreError {
    StoreError::NotFound {
        collection: D::COLLECTION,
        filter: filter.to_string(),
    }
}

fn conflict<D: Document>(key: String) -> StoreError {
    StoreError::Conflict {
        collection: D::COLLECTION,
        key,
    }
}
