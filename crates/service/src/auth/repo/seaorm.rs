use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::{password, user};

use crate::auth::domain::AuthUser;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_email(&self.db, email).await?.map(AuthUser::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?.map(AuthUser::from))
    }

    async fn create_user(&self, email: &str, name: &str) -> Result<AuthUser, AuthError> {
        Ok(user::create(&self.db, email, name).await?.into())
    }

    async fn find_password(&self, user_id: Uuid) -> Result<Option<password::Model>, AuthError> {
        Ok(password::find(&self.db, user_id).await?)
    }

    async fn set_password(&self, user_id: Uuid, phc: String) -> Result<password::Model, AuthError> {
        Ok(password::set(&self.db, user_id, phc).await?)
    }
}
