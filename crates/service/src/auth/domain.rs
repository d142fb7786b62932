use serde::Deserialize;
use uuid::Uuid;

use super::errors::AuthError;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl RegisterInput {
    /// Reject the request before anything is hashed or stored.
    pub fn check(&self) -> Result<(), AuthError> {
        models::user::validate_email(&self.email)?;
        models::user::validate_name(&self.name)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Invalid(format!("password must have at least {MIN_PASSWORD_LEN} characters")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Account as seen by callers of the auth service; carries no secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<models::user::Model> for AuthUser {
    fn from(u: models::user::Model) -> Self {
        Self { id: u.id, email: u.email, name: u.name }
    }
}

/// Successful login: the account plus a freshly signed bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}
