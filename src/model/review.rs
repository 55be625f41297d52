use super::ids::{ProductId, ReviewId};
use crate::docstore::{DocumentMeta, Version};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_RATING: f32 = 2.5;

fn default_rating() -> f32 {
    DEFAULT_RATING
}

/// A review as persisted in the `reviews` collection.
///
/// Unique on `(product_id, review_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntity {
    pub meta: DocumentMeta,
    pub product_id: ProductId,
    pub review_id: ReviewId,
    pub author: String,
    pub rating: f32,
    pub content: String,
}

impl ReviewEntity {
    pub fn to_view(&self) -> Review {
        Review {
            id: Some(self.meta.internal_id),
            product_id: self.product_id,
            review_id: Some(self.review_id),
            author: self.author.clone(),
            rating: self.rating,
            content: self.content.clone(),
            version: self.meta.version,
            created: Some(self.meta.audit.created_at),
            modified: Some(self.meta.audit.modified_at),
        }
    }
}

/// Caller-facing review, and the payload of `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub product_id: ProductId,
    #[serde(default)]
    pub review_id: Option<ReviewId>,
    pub author: String,
    #[serde(default = "default_rating")]
    pub rating: f32,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub version: Version,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new(product_id: ProductId, author: impl Into<String>) -> Self {
        Self {
            id: None,
            product_id,
            review_id: None,
            author: author.into(),
            rating: DEFAULT_RATING,
            content: String::new(),
            version: Version::INITIAL,
            created: None,
            modified: None,
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Fields needed to create a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub product_id: ProductId,
    pub author: String,
    pub rating: f32,
    pub content: String,
}

impl ReviewDraft {
    pub fn new(product_id: ProductId, author: impl Into<String>) -> Self {
        Self {
            product_id,
            author: author.into(),
            rating: DEFAULT_RATING,
            content: String::new(),
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

impl From<Review> for ReviewDraft {
    fn from(review: Review) -> Self {
        Self {
            product_id: review.product_id,
            author: review.author,
            rating: review.rating,
            content: review.content,
        }
    }
}

/// The fields an update may change. The parent product is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewPatch {
    pub author: String,
    pub rating: f32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewQuery {
    /// All reviews of one product.
    ByProduct(ProductId),
    ById(ReviewId),
}
