//! Store traits for [`ReviewEntity`].
//!
//! The unique index is the compound `(product_id, review_id)`. Updates may change
//! `author`, `rating` and `content`; the parent product is fixed at creation.

use crate::docstore::{Document, DocumentMeta};
use crate::model::{
    ProductId, Review, ReviewDraft, ReviewEntity, ReviewId, ReviewPatch, ReviewQuery,
};
use crate::versioned::{CatalogEntity, UpsertTarget};

impl Document for ReviewEntity {
    type Key = (ProductId, ReviewId);
    type Query = ReviewQuery;
    type Patch = ReviewPatch;

    const COLLECTION: &'static str = "reviews";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn unique_key(&self) -> (ProductId, ReviewId) {
        (self.product_id, self.review_id)
    }

    fn matches(&self, query: &ReviewQuery) -> bool {
        match query {
            ReviewQuery::ByProduct(product_id) => self.product_id == *product_id,
            ReviewQuery::ById(review_id) => self.review_id == *review_id,
        }
    }

    fn apply_patch(&mut self, patch: ReviewPatch) {
        self.author = patch.author;
        self.rating = patch.rating;
        self.content = patch.content;
    }
}

impl CatalogEntity for ReviewEntity {
    type BusinessId = ReviewId;
    type Draft = ReviewDraft;
    type View = Review;

    const COUNTER: &'static str = "_review_sequence";

    fn from_draft(meta: DocumentMeta, review_id: ReviewId, draft: ReviewDraft) -> Self {
        Self {
            meta,
            product_id: draft.product_id,
            review_id,
            author: draft.author,
            rating: draft.rating,
            content: draft.content,
        }
    }

    fn business_id(&self) -> ReviewId {
        self.review_id
    }

    fn view(&self) -> Review {
        self.to_view()
    }

    fn by_business_id(id: ReviewId) -> ReviewQuery {
        ReviewQuery::ById(id)
    }

    fn classify(write: Review) -> UpsertTarget<Self> {
        match write.review_id {
            Some(business_id) => UpsertTarget::Existing {
                business_id,
                expected: write.version,
                patch: ReviewPatch {
                    author: write.author,
                    rating: write.rating,
                    content: write.content,
                },
            },
            None => UpsertTarget::Fresh(ReviewDraft::from(write)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(product: u64, id: u64) -> ReviewEntity {
        ReviewEntity::from_draft(
            DocumentMeta::fresh(),
            ReviewId(id),
            ReviewDraft::new(ProductId(product), "ann"),
        )
    }

    #[test]
    fn unique_key_is_compound() {
        assert_eq!(review(1, 5).unique_key(), (ProductId(1), ReviewId(5)));
        assert_ne!(review(1, 5).unique_key(), review(2, 5).unique_key());
    }

    #[test]
    fn queries_select_by_parent_or_by_id() {
        let r = review(1, 5);
        assert!(r.matches(&ReviewQuery::ByProduct(ProductId(1))));
        assert!(!r.matches(&ReviewQuery::ByProduct(ProductId(2))));
        assert!(r.matches(&ReviewQuery::ById(ReviewId(5))));
    }

    #[test]
    fn write_without_review_id_is_a_create_under_its_product() {
        let write = Review::new(ProductId(7), "bob").with_rating(4.5);
        match ReviewEntity::classify(write) {
            UpsertTarget::Fresh(draft) => {
                assert_eq!(draft.product_id, ProductId(7));
                assert_eq!(draft.rating, 4.5);
            }
            UpsertTarget::Existing { .. } => panic!("expected a create"),
        }
    }
}
