use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use models::shop::{self, Entity as ShopEntity, NewShop, ShopPatch};

use crate::errors::ServiceError;

/// Persistence primitives for shops.
///
/// Mutations are conditional on `(id, owner)` so the ownership check and the
/// write happen in one statement.
#[async_trait]
pub trait ShopRepository: Send + Sync {
    /// All shops of `owner`, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<shop::Model>, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<shop::Model>, ServiceError>;
    async fn insert(&self, owner: Uuid, input: NewShop) -> Result<shop::Model, ServiceError>;
    /// Apply `patch` to the shop only if it is owned by `owner`.
    /// Returns the post-update row, or `None` when no row matched.
    async fn update_owned(&self, id: Uuid, owner: Uuid, patch: &ShopPatch) -> Result<Option<shop::Model>, ServiceError>;
    /// Remove the shop only if it is owned by `owner`; true if a row was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmShopRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ShopRepository for SeaOrmShopRepository {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<shop::Model>, ServiceError> {
        let rows = ShopEntity::find()
            .filter(shop::Column::Owner.eq(owner))
            .order_by_desc(shop::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<shop::Model>, ServiceError> {
        Ok(ShopEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, owner: Uuid, input: NewShop) -> Result<shop::Model, ServiceError> {
        Ok(shop::create(&self.db, owner, input).await?)
    }

    async fn update_owned(&self, id: Uuid, owner: Uuid, patch: &ShopPatch) -> Result<Option<shop::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        if !patch.is_empty() {
            let res = patch
                .apply_to_update(ShopEntity::update_many())
                .filter(shop::Column::Id.eq(id))
                .filter(shop::Column::Owner.eq(owner))
                .exec(&txn)
                .await?;
            if res.rows_affected == 0 {
                txn.rollback().await?;
                return Ok(None);
            }
        }
        let row = ShopEntity::find_by_id(id)
            .filter(shop::Column::Owner.eq(owner))
            .one(&txn)
            .await?;
        txn.commit().await?;
        Ok(row)
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, ServiceError> {
        let res = ShopEntity::delete_many()
            .filter(shop::Column::Id.eq(id))
            .filter(shop::Column::Owner.eq(owner))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}

/// In-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockShopRepository {
        rows: Mutex<Vec<shop::Model>>,
        writes: AtomicUsize,
        broken: AtomicBool,
    }

    impl MockShopRepository {
        /// Number of inserts, updates and deletes that changed stored rows.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

        /// Make every subsequent call fail like an unreachable database.
        pub fn break_storage(&self) { self.broken.store(true, Ordering::SeqCst); }

        fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<shop::Model>>, ServiceError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection refused".into()));
            }
            self.rows.lock().map_err(|_| ServiceError::Db("mock store poisoned".into()))
        }
    }

    #[async_trait]
    impl ShopRepository for MockShopRepository {
        async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<shop::Model>, ServiceError> {
            let rows = self.rows()?;
            let mut out: Vec<_> = rows.iter().filter(|r| r.owner == owner).cloned().collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<shop::Model>, ServiceError> {
            Ok(self.rows()?.iter().find(|r| r.id == id).cloned())
        }

        async fn insert(&self, owner: Uuid, input: NewShop) -> Result<shop::Model, ServiceError> {
            let mut rows = self.rows()?;
            let model = input.into_model(owner)?;
            self.writes.fetch_add(1, Ordering::SeqCst);
            rows.push(model.clone());
            Ok(model)
        }

        async fn update_owned(&self, id: Uuid, owner: Uuid, patch: &ShopPatch) -> Result<Option<shop::Model>, ServiceError> {
            let mut rows = self.rows()?;
            let Some(row) = rows.iter_mut().find(|r| r.id == id && r.owner == owner) else { return Ok(None) };
            if !patch.is_empty() {
                self.writes.fetch_add(1, Ordering::SeqCst);
                patch.apply_to_model(row);
            }
            Ok(Some(row.clone()))
        }

        async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, ServiceError> {
            let mut rows = self.rows()?;
            let before = rows.len();
            rows.retain(|r| !(r.id == id && r.owner == owner));
            let removed = rows.len() < before;
            if removed {
                self.writes.fetch_add(1, Ordering::SeqCst);
            }
            Ok(removed)
        }
    }
}
