//! Transaction-scoped access to shipping addresses.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::address::{self, ActiveModel, Entity as AddressEntity};
use crate::domain::Address;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct NewAddressRecord {
    pub user_id: i32,
    pub house_no: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
}

pub struct TxAddressRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAddressRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn create(&self, record: NewAddressRecord) -> AppResult<Address> {
        let active_model = ActiveModel {
            user_id: Set(record.user_id),
            house_no: Set(record.house_no),
            street: Set(record.street),
            city: Set(record.city),
            postal_code: Set(record.postal_code),
            phone: Set(record.phone),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(Address::from(model))
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Address>> {
        let models = AddressEntity::find()
            .filter(address::Column::UserId.eq(user_id))
            .order_by_asc(address::Column::Id)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Address::from).collect())
    }

    /// Delete an address owned by `user_id`. Returns whether a row was removed.
    pub async fn delete_owned(&self, user_id: i32, address_id: i32) -> AppResult<bool> {
        let result = AddressEntity::delete_many()
            .filter(address::Column::Id.eq(address_id))
            .filter(address::Column::UserId.eq(user_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
