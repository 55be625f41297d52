//! Runtime orchestration and lifecycle management.
//!
//! - [`CatalogSystem`] - starts the actors, wires the services and shuts everything down
//! - [`setup_tracing`] - initializes logging for the process

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::CatalogSystem;
pub use self::tracing::setup_tracing;
