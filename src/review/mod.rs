//! Review-specific store logic: reviews are unique per (product, review id) and
//! are read by their parent product.

pub mod entity;

use crate::docstore::{CollectionActor, CollectionClient};
use crate::model::ReviewEntity;

/// Creates the reviews collection actor and its client.
pub fn new(capacity: usize) -> (CollectionActor<ReviewEntity>, CollectionClient<ReviewEntity>) {
    CollectionActor::new(capacity)
}
