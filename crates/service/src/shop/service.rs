use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::shop::{self, NewShop, ShopPatch};

use crate::errors::ServiceError;
use crate::shop::repository::ShopRepository;

/// Application service enforcing shop ownership rules.
///
/// The caller identity is always passed in explicitly as `owner`; it is never
/// read from the client payload.
pub struct ShopService<R: ShopRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ShopRepository + ?Sized> ShopService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn list(&self, owner: Uuid) -> Result<Vec<shop::Model>, ServiceError> {
        self.repo.list_by_owner(owner).await
    }

    /// Validate then insert. Nothing reaches the repository when a required field is missing.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::shop::NewShop;
    /// use service::shop::{ShopService, repository::mock::MockShopRepository};
    /// let svc = ShopService::new(Arc::new(MockShopRepository::default()));
    /// let owner = uuid::Uuid::new_v4();
    /// let input = NewShop { name: Some("Acme".into()), email: Some("a@x.com".into()), ..Default::default() };
    /// let shop = tokio_test::block_on(svc.create(owner, input)).unwrap();
    /// assert_eq!(shop.owner, owner);
    /// assert_eq!(shop.category, "successful");
    /// ```
    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create(&self, owner: Uuid, input: NewShop) -> Result<shop::Model, ServiceError> {
        input.validate()?;
        let created = self.repo.insert(owner, input).await?;
        info!(id = %created.id, "shop_created");
        Ok(created)
    }

    /// Sparse update of a shop owned by `owner`.
    #[instrument(skip(self, patch), fields(owner = %owner, id = %id, fields = ?patch.fields()))]
    pub async fn update(&self, owner: Uuid, id: Uuid, patch: ShopPatch) -> Result<shop::Model, ServiceError> {
        match self.repo.update_owned(id, owner, &patch).await? {
            Some(updated) => {
                info!("shop_updated");
                Ok(updated)
            }
            None => Err(self.explain_miss(owner, id).await),
        }
    }

    #[instrument(skip(self), fields(owner = %owner, id = %id))]
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        if self.repo.delete_owned(id, owner).await? {
            info!("shop_deleted");
            return Ok(());
        }
        Err(self.explain_miss(owner, id).await)
    }

    /// A conditional write matched nothing: the shop is either gone or owned by someone else.
    async fn explain_miss(&self, owner: Uuid, id: Uuid) -> ServiceError {
        match self.repo.find_by_id(id).await {
            Ok(None) => ServiceError::not_found("shop"),
            Ok(Some(existing)) => {
                warn!(owner = %owner, actual_owner = %existing.owner, "shop_ownership_mismatch");
                ServiceError::Unauthorized("shop belongs to another user".into())
            }
            Err(e) => e,
        }
    }
}
