//! Generic versioned entity store.
//!
//! [`VersionedStore<K>`] implements create / read-by-business-id / conditional update /
//! delete / list-all once, for every kind that implements [`CatalogEntity`]. It is the
//! only place the sequence generator and the store's version check meet.

pub mod entity;
pub mod store;

pub use entity::{CatalogEntity, UpsertTarget};
pub use store::VersionedStore;
