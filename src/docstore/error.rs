//! # Store Errors
//!
//! Errors reported by the document store primitives. Every primitive either
//! succeeds completely or fails with one of these and leaves no partial state.

/// Errors that can occur within the document store itself.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    /// The backing task is gone (channel closed or response dropped).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// A write would duplicate a unique index entry or an internal id.
    #[error("Duplicate key in {collection}: {key}")]
    Conflict { collection: &'static str, key: String },
    #[error("No document in {collection} matches {filter}")]
    NotFound { collection: &'static str, filter: String },
}
