//! Catalog data types: persisted entities, their caller-facing views, drafts and patches.
//!
//! Entities are what the store holds; views are what callers see and send back.
//! The two are kept apart so that store-controlled metadata never comes from a caller.

pub mod ids;
pub mod product;
pub mod review;

pub use ids::{ProductId, ReviewId};
pub use product::*;
pub use review::*;
