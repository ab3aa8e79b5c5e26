//! Transaction-scoped access to the catalog.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::Product;
use crate::errors::{AppError, AppResult};

/// Column values for a new catalog row.
#[derive(Debug, Clone)]
pub struct NewProductRecord {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price_cents: i64,
}

pub struct TxProductRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxProductRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn find_by_product_id(&self, product_id: &str) -> AppResult<Option<Product>> {
        let result = ProductEntity::find()
            .filter(product::Column::ProductId.eq(product_id))
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Product::from))
    }

    pub async fn exists(&self, product_id: &str) -> AppResult<bool> {
        let count = ProductEntity::find()
            .filter(product::Column::ProductId.eq(product_id))
            .count(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    /// Case-insensitive substring match on the product name.
    ///
    /// `%`, `_` and `\` in `fragment` match themselves. The fragment is
    /// folded the same way the backend's `LOWER()` folds the column: ASCII
    /// only on SQLite, full Unicode elsewhere.
    pub async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Product>> {
        let folded = fold_case(self.txn.get_database_backend(), fragment);
        let pattern = format!("%{}%", escape_like(&folded));

        let models = ProductEntity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(product::Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            )
            .order_by_asc(product::Column::Id)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    /// Oldest `limit` products.
    pub async fn list_first(&self, limit: u64) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .order_by_asc(product::Column::Id)
            .limit(limit)
            .all(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    pub async fn create(&self, record: NewProductRecord) -> AppResult<Product> {
        let active_model = ActiveModel {
            product_id: Set(record.product_id),
            name: Set(record.name),
            description: Set(record.description),
            image: Set(record.image),
            price_cents: Set(record.price_cents),
            rating: Set(0),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete_by_product_id(&self, product_id: &str) -> AppResult<bool> {
        let result = ProductEntity::delete_many()
            .filter(product::Column::ProductId.eq(product_id))
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}

fn fold_case(backend: DatabaseBackend, text: &str) -> String {
    match backend {
        DatabaseBackend::Sqlite => text.to_ascii_lowercase(),
        _ => text.to_lowercase(),
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_like, fold_case};
    use sea_orm::DatabaseBackend;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("cloak"), "cloak");
    }

    #[test]
    fn test_fold_case_follows_backend_lower() {
        assert_eq!(fold_case(DatabaseBackend::Sqlite, "ÉLAN Tee"), "Élan tee");
        assert_eq!(fold_case(DatabaseBackend::Postgres, "ÉLAN Tee"), "élan tee");
    }
}
