//! Typed business ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! business_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

business_id!(
    /// Sequential product id drawn from `_product_sequence`.
    ProductId
);

business_id!(
    /// Sequential review id drawn from `_review_sequence`.
    ReviewId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        assert_eq!(serde_json::to_string(&ProductId(3)).unwrap(), "3");
        assert_eq!(serde_json::from_str::<ReviewId>("12").unwrap(), ReviewId(12));
        assert_eq!(u64::from(ProductId::from(9)), 9);
    }
}
