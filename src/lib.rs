//! # Catalog Store
//!
//! > **Products and reviews with sequential ids and optimistic locking, on actors.**
//!
//! The catalog's one hard problem is correctness under concurrent writers against a
//! store that is atomic per document but offers no cross-document transactions:
//!
//! - new entities need gap-free, collision-free numeric ids, and
//! - updates must not silently overwrite each other.
//!
//! Ids come from named counters incremented atomically by the store. Updates are
//! conditional on the version the caller last saw.
//!
//! ## Concurrency Model
//!
//! Every collection and the counter table is owned by its own Tokio task. Requests on
//! one collection are processed one at a time, so each single-document operation is
//! atomic; different collections run in parallel. There are no locks and no
//! in-process caches: the actors are the only shared mutable state.
//!
//! A create reserves an id and then inserts in two steps. If the insert fails, the id
//! stays consumed. Ids are never reused, not even after delete.
//!
//! ## Module Tour
//!
//! ### 1. The Store ([`docstore`])
//! Actor-backed collections and counters behind the [`DocumentStore`](docstore::DocumentStore)
//! and [`CounterStore`](docstore::CounterStore) traits.
//!
//! ### 2. The Core ([`sequence`], [`versioned`])
//! [`SequenceGenerator`](sequence::SequenceGenerator) and the generic
//! [`VersionedStore`](versioned::VersionedStore), written once for every
//! [`CatalogEntity`](versioned::CatalogEntity).
//!
//! ### 3. The Kinds ([`model`], [`product`], [`review`])
//! Data types and their per-kind store rules (unique keys, update whitelist, counter name).
//!
//! ### 4. The Interface ([`services`])
//! [`ProductService`](services::ProductService) and [`ReviewService`](services::ReviewService),
//! with shared CRUD from [`EntityService`](services::EntityService).
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`CatalogSystem`](lifecycle::CatalogSystem) starts, wires and stops everything.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```
//!
//! See [`docstore::mock`] for scripted stores that inject failures in tests.

pub mod config;
pub mod docstore;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod product;
pub mod review;
pub mod sequence;
pub mod services;
pub mod versioned;

pub use error::{CatalogError, CatalogResult};
