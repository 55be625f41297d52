//! Error types for the catalog core.

use crate::docstore::StoreError;
use thiserror::Error;

/// Errors returned by the sequence generator, the versioned store and the entity services.
///
/// Nothing here is retried internally; each variant tells the caller what to do next.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// Transient infrastructure failure. No id or write may be assumed to have happened.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A uniqueness constraint rejected a create.
    #[error("{kind} already exists: {key}")]
    Conflict { kind: &'static str, key: String },

    /// The entity moved past `expected` (or disappeared) before this update could apply.
    /// Re-read and retry if the change still makes sense.
    #[error("{kind} {business_id} was modified concurrently (expected version {expected})")]
    OptimisticLockConflict {
        kind: &'static str,
        business_id: u64,
        expected: u64,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => CatalogError::StoreUnavailable(reason),
            StoreError::Conflict { collection, key } => CatalogError::Conflict {
                kind: collection,
                key,
            },
            StoreError::NotFound { collection, filter } => CatalogError::NotFound {
                kind: collection,
                id: filter,
            },
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
