//! Catalog store - product listing, search and admin maintenance.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{HOME_LISTING_LIMIT, MAX_PRICE_CENTS, PRODUCT_ID_PREFIX};
use crate::domain::validation::require;
use crate::domain::{NewProduct, Product};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewProductRecord;
use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Create a product on behalf of an admin account
    async fn add_product(&self, acting_user: String, input: NewProduct) -> AppResult<Product>;

    async fn get_product(&self, product_id: String) -> AppResult<Product>;

    /// Case-insensitive substring search on product names
    async fn search_by_name(&self, fragment: String) -> AppResult<Vec<Product>>;

    /// Landing page listing, oldest products first
    async fn list_for_home(&self) -> AppResult<Vec<Product>>;

    /// Hard delete on behalf of an admin account. Cart lines keep their
    /// snapshot of the product.
    async fn remove_product(&self, acting_user: String, product_id: String) -> AppResult<()>;

    async fn product_exists(&self, product_id: String) -> AppResult<bool>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Fail with `Unauthorized` unless `user_id` is an existing admin account.
async fn ensure_admin(ctx: &TransactionContext<'_>, user_id: &str) -> AppResult<()> {
    match ctx.users().find_by_user_id(user_id).await? {
        Some(user) if user.is_admin() => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

fn validate_new_product(input: NewProduct) -> AppResult<NewProductRecord> {
    if input.price_cents < 0 {
        return Err(AppError::validation("Price must not be negative"));
    }
    if input.price_cents > MAX_PRICE_CENTS {
        return Err(AppError::validation(format!(
            "Price must not exceed {} cents",
            MAX_PRICE_CENTS
        )));
    }

    Ok(NewProductRecord {
        product_id: format!("{}{}", PRODUCT_ID_PREFIX, Uuid::new_v4()),
        name: require("Name", &input.name)?,
        description: require("Description", &input.description)?,
        image: require("Image", &input.image)?,
        price_cents: input.price_cents,
    })
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn add_product(&self, acting_user: String, input: NewProduct) -> AppResult<Product> {
        let actor = acting_user.clone();
        let product = with_transaction!(self.uow, |ctx| {
            ensure_admin(&ctx, &acting_user).await?;
            let record = validate_new_product(input)?;
            ctx.products().create(record).await
        })?;

        tracing::info!(
            product_id = %product.product_id,
            admin = %actor,
            price_cents = product.price_cents,
            "Product added"
        );
        Ok(product)
    }

    async fn get_product(&self, product_id: String) -> AppResult<Product> {
        let product =
            with_transaction!(self.uow, |ctx| ctx.products().find_by_product_id(&product_id).await)?;
        product.ok_or(AppError::ProductNotFound)
    }

    async fn search_by_name(&self, fragment: String) -> AppResult<Vec<Product>> {
        let fragment = require("Product name", &fragment)?;
        with_transaction!(self.uow, |ctx| ctx.products().search_by_name(&fragment).await)
    }

    async fn list_for_home(&self) -> AppResult<Vec<Product>> {
        with_transaction!(self.uow, |ctx| ctx.products().list_first(HOME_LISTING_LIMIT).await)
    }

    async fn remove_product(&self, acting_user: String, product_id: String) -> AppResult<()> {
        let actor = acting_user.clone();
        let removed = product_id.clone();
        with_transaction!(self.uow, |ctx| {
            ensure_admin(&ctx, &acting_user).await?;
            if !ctx.products().delete_by_product_id(&product_id).await? {
                return Err(AppError::ProductNotFound);
            }
            Ok(())
        })?;

        tracing::info!(product_id = %removed, admin = %actor, "Product removed");
        Ok(())
    }

    async fn product_exists(&self, product_id: String) -> AppResult<bool> {
        with_transaction!(self.uow, |ctx| ctx.products().exists(&product_id).await)
    }
}
