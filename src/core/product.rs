//! Product domain model.
//!
//! A product is a named stock line owned by exactly one user. The quantity is
//! unsigned so it can never go negative by construction; successful payments
//! consume it one unit at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stock line owned by a user.
///
/// The owner is fixed at creation time and never changes; name and quantity
/// are mutable by the owner only. Every mutation refreshes `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,

    pub name: String,

    /// Remaining stock. Consumed by successful payments.
    pub quantity: u32,

    /// The owning user. Immutable after creation.
    #[serde(rename = "user_id")]
    pub owner_id: Uuid,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, quantity: u32, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the `updated_at` timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields required to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: u32,
    pub owner_id: Uuid,
}

/// Partial update applied to a product by its owner.
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub quantity: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_sets_timestamps() {
        let owner = Uuid::new_v4();
        let product = Product::new("Laptop", 10, owner);
        assert_eq!(product.name, "Laptop");
        assert_eq!(product.quantity, 10);
        assert_eq!(product.owner_id, owner);
        assert_eq!(product.created_at, product.updated_at);
    }

    #[test]
    fn touch_advances_updated_at() {
        let mut product = Product::new("Laptop", 10, Uuid::new_v4());
        let before = product.updated_at;
        product.touch();
        assert!(product.updated_at >= before);
    }

    #[test]
    fn owner_serializes_as_user_id() {
        let product = Product::new("Laptop", 10, Uuid::new_v4());
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("user_id").is_some());
        assert!(json.get("owner_id").is_none());
    }
}
