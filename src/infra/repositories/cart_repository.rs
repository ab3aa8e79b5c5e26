//! Transaction-scoped access to cart lines.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::cart_item::{self, ActiveModel, Entity as CartItemEntity};
use crate::domain::{CartLine, Product};
use crate::errors::{AppError, AppResult};

pub struct TxCartRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxCartRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Insert a snapshot line for `(user_id, product)` or, when one exists,
    /// add `quantity` to it and overwrite color/size. The snapshot columns
    /// of an existing line are left alone.
    pub async fn upsert(
        &self,
        user_id: i32,
        product: &Product,
        quantity: i32,
        color: Option<String>,
        size: Option<String>,
    ) -> AppResult<CartLine> {
        let now = chrono::Utc::now();
        let line = ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product.id),
            product_ref: Set(product.product_id.clone()),
            product_name: Set(product.name.clone()),
            price_cents: Set(product.price_cents),
            rating: Set(product.rating),
            image: Set(product.image.clone()),
            quantity: Set(quantity),
            color: Set(color),
            size: Set(size),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        CartItemEntity::insert(line)
            .on_conflict(
                OnConflict::columns([cart_item::Column::UserId, cart_item::Column::ProductId])
                    .value(
                        cart_item::Column::Quantity,
                        Expr::col((CartItemEntity, cart_item::Column::Quantity)).add(quantity),
                    )
                    .update_columns([
                        cart_item::Column::Color,
                        cart_item::Column::Size,
                        cart_item::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.txn)
            .await
            .map_err(AppError::from)?;

        self.find(user_id, product.id)
            .await?
            .ok_or_else(|| AppError::internal("cart line missing after upsert"))
    }

    pub async fn find(&self, user_id: i32, product_id: i32) -> AppResult<Option<CartLine>> {
        let result = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(CartLine::from))
    }

    /// Find a line by the external product identifier it was snapshotted from.
    pub async fn find_by_product_ref(
        &self,
        user_id: i32,
        product_ref: &str,
    ) -> AppResult<Option<CartLine>> {
        let result = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .filter(cart_item::Column::ProductRef.eq(product_ref))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(CartLine::from))
    }

    /// All lines of a user, oldest first.
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<CartLine>> {
        let models = CartItemEntity::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .order_by_asc(cart_item::Column::Id)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(CartLine::from).collect())
    }

    /// Overwrite quantity and variant of an existing line.
    pub async fn update(
        &self,
        line_id: i32,
        quantity: i32,
        color: Option<String>,
        size: Option<String>,
    ) -> AppResult<()> {
        let active = ActiveModel {
            id: Set(line_id),
            quantity: Set(quantity),
            color: Set(color),
            size: Set(size),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        active.update(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    pub async fn delete(&self, line_id: i32) -> AppResult<()> {
        CartItemEntity::delete_by_id(line_id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }
}
