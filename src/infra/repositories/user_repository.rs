//! Transaction-scoped access to user accounts.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{User, UserRole};
use crate::errors::{conflict_on_unique, AppError, AppResult};

/// Column values for a new account row.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// Transaction-aware user repository.
///
/// Borrows the transaction so every call joins the same unit of work.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find user by external identifier
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::UserId.eq(user_id))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Find user by email (stored lowercased)
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Insert a new account. A taken email surfaces as `Conflict`.
    pub async fn create(&self, record: NewUserRecord) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            user_id: Set(record.user_id),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            email: Set(record.email),
            phone: Set(record.phone),
            password_hash: Set(record.password_hash),
            role: Set(record.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(|e| conflict_on_unique(e, "Email"))?;

        Ok(User::from(model))
    }

    /// List all accounts in registration order
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }
}
