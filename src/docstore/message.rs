//! # Store Messages
//!
//! The requests a [`CollectionClient`](crate::docstore::CollectionClient) sends to its
//! [`CollectionActor`](crate::docstore::CollectionActor), and the counter requests
//! served by the [`CounterActor`](crate::docstore::CounterActor).
//!
//! Each variant is one atomic primitive. Because the actor handles one message at a
//! time, a variant is never interleaved with another request on the same collection.

use crate::docstore::document::{Document, Filter, Version};
use crate::docstore::error::StoreError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actors.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum StoreRequest<D: Document> {
    Insert {
        doc: D,
        respond_to: Response<D>,
    },
    FindOne {
        filter: Filter<D::Query>,
        respond_to: Response<D>,
    },
    FindMany {
        filter: Filter<D::Query>,
        respond_to: Response<Vec<D>>,
    },
    Count {
        filter: Filter<D::Query>,
        respond_to: Response<usize>,
    },
    /// Replace the whitelisted fields of the single document matching `filter`
    /// whose version is still `expected`.
    ConditionalReplace {
        filter: Filter<D::Query>,
        expected: Version,
        patch: D::Patch,
        respond_to: Response<D>,
    },
    DeleteOne {
        filter: Filter<D::Query>,
        respond_to: Response<D>,
    },
}

#[derive(Debug)]
pub enum CounterRequest {
    /// Add one to the named counter, creating it at 1 if absent, and return the new value.
    IncrementOrCreate {
        name: String,
        respond_to: Response<u64>,
    },
    Current {
        name: String,
        respond_to: Response<Option<u64>>,
    },
}
