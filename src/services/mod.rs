//! Entity services: the CRUD contract callers use.
//!
//! Each service is a thin, cloneable wrapper around a [`VersionedStore`](crate::versioned::VersionedStore)
//! for one kind. Common operations come from [`EntityService`]; the kind-specific
//! reads live on the concrete service.

pub mod entity_service;
pub mod product;
pub mod review;

pub use entity_service::EntityService;
pub use product::ProductService;
pub use review::ReviewService;
