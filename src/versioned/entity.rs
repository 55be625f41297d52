//! # CatalogEntity Trait
//!
//! What a [`Document`] additionally needs to be managed by a
//! [`VersionedStore`](crate::versioned::VersionedStore): a business id drawn from a
//! named counter, a draft to build new instances from, and a caller-facing write
//! payload that either targets an existing entity or asks for a new one.

use crate::docstore::{Document, DocumentMeta, Version};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that each entity kind (Product, Review) implements.
pub trait CatalogEntity: Document {
    /// Sequential, caller-visible identity. Built from the counter value.
    type BusinessId: Copy + Eq + Hash + Debug + Display + Send + Sync + From<u64> + Into<u64>;

    /// The data required to create a new instance.
    type Draft: Send + Debug;

    /// Caller-facing representation. Doubles as the update payload: business id
    /// (optional), expected version and field values.
    type View: Send + Debug + 'static;

    /// Name of the counter document this kind draws business ids from.
    const COUNTER: &'static str;

    /// Build the full entity once its identity has been assigned.
    fn from_draft(meta: DocumentMeta, business_id: Self::BusinessId, draft: Self::Draft) -> Self;

    fn business_id(&self) -> Self::BusinessId;

    fn view(&self) -> Self::View;

    /// The query selecting exactly the entity with this business id.
    fn by_business_id(id: Self::BusinessId) -> Self::Query;

    /// Decide whether a write updates an existing entity or creates a new one.
    fn classify(write: Self::View) -> UpsertTarget<Self>;
}

/// Where an upsert goes.
#[derive(Debug)]
pub enum UpsertTarget<K: CatalogEntity> {
    /// Conditional update of the entity with `business_id`, only while it is still at `expected`.
    Existing {
        business_id: K::BusinessId,
        expected: Version,
        patch: K::Patch,
    },
    /// No business id was supplied: create from these fields.
    Fresh(K::Draft),
}
