//! Store traits for [`ProductEntity`].
//!
//! - Unique index: `product_id`.
//! - Update whitelist: `name`, `cost`.
//! - A write without a `product_id` is a create.

use crate::docstore::{Document, DocumentMeta};
use crate::model::{Product, ProductDraft, ProductEntity, ProductId, ProductPatch, ProductQuery};
use crate::versioned::{CatalogEntity, UpsertTarget};

impl Document for ProductEntity {
    type Key = ProductId;
    type Query = ProductQuery;
    type Patch = ProductPatch;

    const COLLECTION: &'static str = "products";

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    fn unique_key(&self) -> ProductId {
        self.product_id
    }

    fn matches(&self, query: &ProductQuery) -> bool {
        match query {
            ProductQuery::ById(id) => self.product_id == *id,
        }
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        self.name = patch.name;
        self.cost = patch.cost;
    }
}

impl CatalogEntity for ProductEntity {
    type BusinessId = ProductId;
    type Draft = ProductDraft;
    type View = Product;

    const COUNTER: &'static str = "_product_sequence";

    fn from_draft(meta: DocumentMeta, product_id: ProductId, draft: ProductDraft) -> Self {
        Self {
            meta,
            product_id,
            name: draft.name,
            cost: draft.cost,
        }
    }

    fn business_id(&self) -> ProductId {
        self.product_id
    }

    fn view(&self) -> Product {
        self.to_view()
    }

    fn by_business_id(id: ProductId) -> ProductQuery {
        ProductQuery::ById(id)
    }

    fn classify(write: Product) -> UpsertTarget<Self> {
        match write.product_id {
            Some(business_id) => UpsertTarget::Existing {
                business_id,
                expected: write.version,
                patch: ProductPatch {
                    name: write.name,
                    cost: write.cost,
                },
            },
            None => UpsertTarget::Fresh(ProductDraft::from(write)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstore::Version;

    #[test]
    fn write_with_id_targets_existing_at_its_version() {
        let mut write = Product::new("Cup-2", 41000);
        write.product_id = Some(ProductId(3));
        write.version = Version::from_value(5);

        match ProductEntity::classify(write) {
            UpsertTarget::Existing {
                business_id,
                expected,
                patch,
            } => {
                assert_eq!(business_id, ProductId(3));
                assert_eq!(expected, Version::from_value(5));
                assert_eq!(patch.name, "Cup-2");
                assert_eq!(patch.cost, 41000);
            }
            UpsertTarget::Fresh(_) => panic!("expected an update"),
        }
    }

    #[test]
    fn write_without_id_is_a_create() {
        assert!(matches!(
            ProductEntity::classify(Product::new("Cup-1", 38000)),
            UpsertTarget::Fresh(ProductDraft { cost: 38000, .. })
        ));
    }

    #[test]
    fn patch_leaves_identity_alone() {
        let mut entity =
            ProductEntity::from_draft(DocumentMeta::fresh(), ProductId(1), ProductDraft::new("a", 1));
        let meta = entity.meta;
        entity.apply_patch(ProductPatch { name: "b".into(), cost: 2 });

        assert_eq!(entity.product_id, ProductId(1));
        assert_eq!(entity.meta, meta);
        assert_eq!((entity.name.as_str(), entity.cost), ("b", 2));
    }
}
