//! Catalog product entity and related types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Product domain entity
#[derive(Debug, Clone)]
pub struct Product {
    /// Internal sequence key
    pub id: i32,
    /// External identifier (`prd` + UUID)
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price in minor units
    pub price_cents: i64,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

/// Admin input for a new catalog entry.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price in minor units
    pub price_cents: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = "prd5b0e6c4a-1f2d-4e3b-8a7c-9d0e1f2a3b4c")]
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    #[schema(example = 2999)]
    pub price_cents: i64,
    #[schema(example = 0)]
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.name,
            description: product.description,
            image: product.image,
            price_cents: product.price_cents,
            rating: product.rating,
            created_at: product.created_at,
        }
    }
}
