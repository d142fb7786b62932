use models::errors::ModelError;
use thiserror::Error;

/// Failures of the register / login / token flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(String),
    #[error("email already registered")]
    EmailTaken,
    #[error("email or password is incorrect")]
    BadCredentials,
    #[error("account no longer exists")]
    UnknownAccount,
    #[error("token rejected: {0}")]
    Token(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl AuthError {
    /// Hashing and storage failures are the server's fault; the rest are the caller's.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Hashing(_) | Self::Storage(_))
    }
}

impl From<ModelError> for AuthError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Invalid(msg),
            invalid @ ModelError::Invalid(_) => Self::Invalid(invalid.to_string()),
            ModelError::Db(msg) => Self::Storage(msg),
        }
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(e: sea_orm::DbErr) -> Self { Self::Storage(e.to_string()) }
}
