//! Cart lines and the snapshot they carry.
//!
//! A line records the product's name, price, rating and image as they were
//! when the product was first added. Later catalog changes never touch it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// One (user, product) row in a cart.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    /// External product identifier at add time
    pub product_ref: String,
    pub product_name: String,
    pub price_cents: i64,
    pub rating: i16,
    pub image: String,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// Price times quantity, clamped at `i64::MAX`.
    pub fn line_total_cents(&self) -> i64 {
        self.price_cents.saturating_mul(i64::from(self.quantity))
    }
}

/// Add or update request for a single cart line.
#[derive(Debug, Clone)]
pub struct CartItemChange {
    /// External product identifier
    pub product_id: String,
    /// Units to add, or the signed delta on update
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub product_id: String,
    pub product_name: String,
    pub price_cents: i64,
    pub rating: i16,
    pub image: String,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub line_total_cents: i64,
    pub added_at: DateTime<Utc>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        let line_total_cents = line.line_total_cents();
        Self {
            product_id: line.product_ref,
            product_name: line.product_name,
            price_cents: line.price_cents,
            rating: line.rating,
            image: line.image,
            quantity: line.quantity,
            color: line.color,
            size: line.size,
            line_total_cents,
            added_at: line.created_at,
        }
    }
}

/// Totals over a whole cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartSummary {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl CartSummary {
    pub fn of(lines: &[CartLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            acc.line_count += 1;
            acc.total_quantity = acc.total_quantity.saturating_add(i64::from(line.quantity));
            acc.subtotal_cents = acc.subtotal_cents.saturating_add(line.line_total_cents());
            acc
        })
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub summary: CartSummary,
}

impl From<Vec<CartLine>> for CartResponse {
    fn from(lines: Vec<CartLine>) -> Self {
        let summary = CartSummary::of(&lines);
        Self {
            items: lines.into_iter().map(CartLineResponse::from).collect(),
            summary,
        }
    }
}
