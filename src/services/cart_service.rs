//! Cart engine.
//!
//! Turns (user, product, quantity, variant) requests into cart-line
//! mutations. Each operation is one transaction: the catalog is consulted
//! for product truth, then the line is inserted, merged, updated or
//! deleted.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{CartItemChange, CartLine, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

#[async_trait]
pub trait CartService: Send + Sync {
    /// Add `quantity` of a product. A repeated add for the same product
    /// merges into the existing line.
    async fn add_to_cart(&self, user_id: String, change: CartItemChange) -> AppResult<CartLine>;

    /// Every line of the user's cart, oldest first
    async fn get_cart(&self, user_id: String) -> AppResult<Vec<CartLine>>;

    async fn get_cart_item(&self, user_id: String, product_id: String) -> AppResult<CartLine>;

    /// Shift the line's quantity by `change.quantity` and replace its variant
    async fn update_cart_item(&self, user_id: String, change: CartItemChange) -> AppResult<()>;

    async fn remove_from_cart(&self, user_id: String, product_id: String) -> AppResult<()>;
}

pub struct CartManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CartManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

async fn resolve_user(ctx: &TransactionContext<'_>, user_id: &str) -> AppResult<User> {
    ctx.users()
        .find_by_user_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)
}

/// Blank variants are stored as absent.
fn variant(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<U: UnitOfWork> CartService for CartManager<U> {
    async fn add_to_cart(&self, user_id: String, change: CartItemChange) -> AppResult<CartLine> {
        if change.quantity <= 0 {
            return Err(AppError::validation("Quantity must be greater than zero"));
        }
        let color = variant(change.color);
        let size = variant(change.size);
        let product_ref = change.product_id;
        let quantity = change.quantity;

        let line = with_transaction!(self.uow, |ctx| {
            let user = resolve_user(&ctx, &user_id).await?;
            let product = ctx
                .products()
                .find_by_product_id(&product_ref)
                .await?
                .ok_or(AppError::ProductNotFound)?;

            let carts = ctx.carts();
            if let Some(existing) = carts.find(user.id, product.id).await? {
                if existing.quantity.checked_add(quantity).is_none() {
                    return Err(AppError::validation("Quantity is too large"));
                }
            }
            carts.upsert(user.id, &product, quantity, color, size).await
        })?;

        tracing::info!(
            product_id = %line.product_ref,
            added = quantity,
            quantity = line.quantity,
            "Cart item added"
        );
        Ok(line)
    }

    async fn get_cart(&self, user_id: String) -> AppResult<Vec<CartLine>> {
        with_transaction!(self.uow, |ctx| {
            let user = resolve_user(&ctx, &user_id).await?;
            ctx.carts().list_for_user(user.id).await
        })
    }

    async fn get_cart_item(&self, user_id: String, product_id: String) -> AppResult<CartLine> {
        with_transaction!(self.uow, |ctx| {
            let user = resolve_user(&ctx, &user_id).await?;
            ctx.carts()
                .find_by_product_ref(user.id, &product_id)
                .await?
                .ok_or(AppError::ItemNotFound)
        })
    }

    async fn update_cart_item(&self, user_id: String, change: CartItemChange) -> AppResult<()> {
        let color = variant(change.color);
        let size = variant(change.size);
        let product_ref = change.product_id;
        let delta = change.quantity;

        let quantity = with_transaction!(self.uow, |ctx| {
            let user = resolve_user(&ctx, &user_id).await?;
            let carts = ctx.carts();
            let line = carts
                .find_by_product_ref(user.id, &product_ref)
                .await?
                .ok_or(AppError::ItemNotFound)?;

            let quantity = match line.quantity.checked_add(delta) {
                Some(q) if q > 0 => q,
                _ => {
                    return Err(AppError::validation(
                        "Quantity change would leave the item with no units",
                    ))
                }
            };
            carts.update(line.id, quantity, color, size).await?;
            Ok(quantity)
        })?;

        tracing::info!(delta = delta, quantity = quantity, "Cart item updated");
        Ok(())
    }

    async fn remove_from_cart(&self, user_id: String, product_id: String) -> AppResult<()> {
        let removed = product_id.clone();
        with_transaction!(self.uow, |ctx| {
            let user = resolve_user(&ctx, &user_id).await?;
            if !ctx.products().exists(&product_id).await? {
                return Err(AppError::ProductNotFound);
            }
            let carts = ctx.carts();
            let line = carts
                .find_by_product_ref(user.id, &product_id)
                .await?
                .ok_or(AppError::ItemNotFound)?;
            carts.delete(line.id).await
        })?;

        tracing::info!(product_id = %removed, "Cart item removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::variant;

    #[test]
    fn test_blank_variant_is_absent() {
        assert_eq!(variant(Some("  ".to_string())), None);
        assert_eq!(variant(None), None);
        assert_eq!(variant(Some(" red ".to_string())), Some("red".to_string()));
    }
}
