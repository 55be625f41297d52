//! Product-specific store logic: globally unique product ids.

pub mod entity;

use crate::docstore::{CollectionActor, CollectionClient};
use crate::model::ProductEntity;

/// Creates the products collection actor and its client.
pub fn new(capacity: usize) -> (CollectionActor<ProductEntity>, CollectionClient<ProductEntity>) {
    CollectionActor::new(capacity)
}
