use async_trait::async_trait;
use uuid::Uuid;

use models::password;

use super::domain::AuthUser;
use super::errors::AuthError;

/// Account and password storage used by [`crate::auth::AuthService`].
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, email: &str, name: &str) -> Result<AuthUser, AuthError>;

    async fn find_password(&self, user_id: Uuid) -> Result<Option<password::Model>, AuthError>;
    /// Store `phc` as the password of `user_id`, replacing any previous one.
    async fn set_password(&self, user_id: Uuid, phc: String) -> Result<password::Model, AuthError>;
}

/// In-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<Vec<AuthUser>>,
        passwords: Mutex<HashMap<Uuid, password::Model>>,
    }

    fn poisoned<T>(_: T) -> AuthError { AuthError::Storage("mock store poisoned".into()) }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.iter().find(|u| u.email == email.trim()).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.iter().find(|u| u.id == id).cloned())
        }

        async fn create_user(&self, email: &str, name: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            if users.iter().any(|u| u.email == email) {
                // mirrors the unique index on user.email
                return Err(AuthError::Storage(format!("duplicate email {email}")));
            }
            let user = AuthUser { id: Uuid::new_v4(), email: email.to_string(), name: name.to_string() };
            users.push(user.clone());
            Ok(user)
        }

        async fn find_password(&self, user_id: Uuid) -> Result<Option<password::Model>, AuthError> {
            Ok(self.passwords.lock().map_err(poisoned)?.get(&user_id).cloned())
        }

        async fn set_password(&self, user_id: Uuid, phc: String) -> Result<password::Model, AuthError> {
            let row = password::Model { user_id, phc, changed_at: Utc::now().into() };
            self.passwords.lock().map_err(poisoned)?.insert(user_id, row.clone());
            Ok(row)
        }
    }
}
