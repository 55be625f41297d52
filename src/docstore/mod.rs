//! Actor-backed document store.
//!
//! This module provides the store the catalog core runs against: keyed documents with a
//! unique index, per-document optimistic versions, and named atomic counters.
//!
//! # Main Components
//!
//! - [`Document`] - Trait that persisted records implement to live in a collection
//! - [`CollectionActor`] - Owns one collection and serializes every request on it
//! - [`CollectionClient`] - Cloneable handle implementing [`DocumentStore`]
//! - [`CounterActor`] / [`CounterClient`] - Named counters implementing [`CounterStore`]
//! - [`StoreError`] - Conflict / NotFound / Unavailable
//!
//! # Testing
//!
//! See [`mock`] for scripted stand-ins that let tests inject store failures.

pub mod client;
pub mod collection;
pub mod counter;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;

pub use client::CollectionClient;
pub use collection::CollectionActor;
pub use counter::{CounterActor, CounterClient};
pub use document::{Audit, Document, DocumentMeta, Filter, Version};
pub use error::StoreError;
pub use message::{CounterRequest, Response, StoreRequest};
pub use store::{CounterStore, DocumentStore};
