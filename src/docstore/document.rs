//! # Document Trait
//!
//! The `Document` trait is the contract every persisted record (products, reviews, ...)
//! satisfies so that a generic [`CollectionActor`](crate::docstore::CollectionActor) can
//! store it. The store only needs to know three things about a document:
//!
//! - its store-controlled metadata ([`DocumentMeta`]: internal id, version, audit times),
//! - the value of its unique index ([`Document::unique_key`]),
//! - how to match a kind-specific query and apply a whitelisted patch.
//!
//! We use associated types (`Key`, `Query`, `Patch`) for the same reason the
//! resource actors do: a `ReviewPatch` can never be sent to the product collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use uuid::Uuid;

/// Optimistic-lock token carried by every document.
///
/// The store advances it by exactly one on every successful replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// Version of a freshly inserted document.
    pub const INITIAL: Version = Version(0);

    pub const fn from_value(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Creation and last-modification times, composed into every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Audit {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            modified_at: now,
        }
    }

    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.modified_at = now;
    }
}

/// The store-controlled part of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub internal_id: Uuid,
    pub version: Version,
    pub audit: Audit,
}

impl DocumentMeta {
    /// Metadata for a document that has not been written yet: a fresh v4 id,
    /// the initial version and audit times of "now".
    pub fn fresh() -> Self {
        Self {
            internal_id: Uuid::new_v4(),
            version: Version::INITIAL,
            audit: Audit::now(),
        }
    }
}

/// Trait that any persisted record must implement to live in a collection.
pub trait Document: Clone + Send + Sync + Debug + 'static {
    /// Value of the collection's unique index (a single field or a compound tuple).
    type Key: Eq + Hash + Clone + Send + Sync + Debug;

    /// Kind-specific selection criteria (e.g. "reviews of product 3").
    type Query: Clone + Send + Sync + Debug;

    /// The whitelisted fields a replace may change.
    type Patch: Send + Sync + Debug;

    /// Name of the collection, used for logging and error reporting.
    const COLLECTION: &'static str;

    fn meta(&self) -> &DocumentMeta;

    fn meta_mut(&mut self) -> &mut DocumentMeta;

    /// The unique index entry for this document.
    fn unique_key(&self) -> Self::Key;

    fn matches(&self, query: &Self::Query) -> bool;

    /// Overwrite the whitelisted fields. Metadata is advanced by the store, not here.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Selects documents inside one collection.
#[derive(Debug, Clone)]
pub enum Filter<Q> {
    All,
    InternalId(Uuid),
    Matching(Q),
}

impl<Q> Filter<Q> {
    pub fn selects<D>(&self, doc: &D) -> bool
    where
        D: Document<Query = Q>,
    {
        match self {
            Filter::All => true,
            Filter::InternalId(id) => doc.meta().internal_id == *id,
            Filter::Matching(query) => doc.matches(query),
        }
    }
}

impl<Q: Debug> Display for Filter<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "all"),
            Filter::InternalId(id) => write!(f, "internal_id={}", id),
            Filter::Matching(query) => write!(f, "{:?}", query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_starts_at_zero_and_steps_by_one() {
        let v = Version::INITIAL;
        assert_eq!(v.value(), 0);
        assert_eq!(v.next(), Version::from_value(1));
        assert!(v.next() > v);
        assert_eq!(v.next().to_string(), "v1");
    }

    #[test]
    fn touch_only_moves_modified_time() {
        let created = Utc::now();
        let mut audit = Audit::at(created);
        let later = created + chrono::Duration::seconds(5);
        audit.touch(later);
        assert_eq!(audit.created_at, created);
        assert_eq!(audit.modified_at, later);
    }

    #[test]
    fn fresh_meta_gets_distinct_ids() {
        let a = DocumentMeta::fresh();
        let b = DocumentMeta::fresh();
        assert_ne!(a.internal_id, b.internal_id);
        assert_eq!(a.version, Version::INITIAL);
    }
}
