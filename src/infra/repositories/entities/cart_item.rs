//! Cart line database entity for SeaORM.
//!
//! `product_id` is the internal product key. It has no relation to
//! `products`: lines survive product removal.

use sea_orm::entity::prelude::*;

use crate::domain::CartLine;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub product_ref: String,
    pub product_name: String,
    pub price_cents: i64,
    pub rating: i16,
    pub image: String,
    pub quantity: i32,
    pub color: Option<String>,
    pub size: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CartLine {
    fn from(model: Model) -> Self {
        CartLine {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            product_ref: model.product_ref,
            product_name: model.product_name,
            price_cents: model.price_cents,
            rating: model.rating,
            image: model.image,
            quantity: model.quantity,
            color: model.color,
            size: model.size,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
