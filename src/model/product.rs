use super::ids::ProductId;
use super::review::Review;
use crate::docstore::{DocumentMeta, Version};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product as persisted in the `products` collection.
///
/// The business id is unique across all products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntity {
    pub meta: DocumentMeta,
    pub product_id: ProductId,
    pub name: String,
    pub cost: i64,
}

impl ProductEntity {
    /// Map to the caller-facing view.
    pub fn to_view(&self) -> Product {
        Product {
            id: Some(self.meta.internal_id),
            product_id: Some(self.product_id),
            name: self.name.clone(),
            cost: self.cost,
            version: self.meta.version,
            created: Some(self.meta.audit.created_at),
            modified: Some(self.meta.audit.modified_at),
        }
    }
}

/// Caller-facing product. Also the payload of `update`: a product without a
/// `product_id` is created, one with a `product_id` is updated at `version`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub cost: i64,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl Product {
    /// A product that has not been stored yet.
    pub fn new(name: impl Into<String>, cost: i64) -> Self {
        Self {
            name: name.into(),
            cost,
            ..Default::default()
        }
    }
}

/// Fields needed to create a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub cost: i64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, cost: i64) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self::new(product.name, product.cost)
    }
}

/// The fields an update may change.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductQuery {
    ById(ProductId),
}

/// A product together with its reviews, assembled at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    pub reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_view_copies_identity_and_audit() {
        let meta = DocumentMeta::fresh();
        let entity = ProductEntity {
            meta,
            product_id: ProductId(4),
            name: "Cup-1".into(),
            cost: 38000,
        };

        let view = entity.to_view();
        assert_eq!(view.id, Some(meta.internal_id));
        assert_eq!(view.product_id, Some(ProductId(4)));
        assert_eq!(view.version, Version::INITIAL);
        assert_eq!(view.created, Some(meta.audit.created_at));
        assert_eq!(view.modified, Some(meta.audit.modified_at));
    }

    #[test]
    fn product_without_id_deserializes_as_new() {
        let product: Product = serde_json::from_str(r#"{"name":"Cup-1","cost":38000}"#).unwrap();
        assert_eq!(product, Product::new("Cup-1", 38000));
        assert!(product.product_id.is_none());
    }
}
