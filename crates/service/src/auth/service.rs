use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::repository::AuthRepository;
use super::token::{self, Claims};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours: 12 }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with an argon2-hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        input.check()?;
        let email = input.email.trim();
        if self.repo.find_user_by_email(email).await?.is_some() {
            debug!("email already registered");
            return Err(AuthError::EmailTaken);
        }

        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string();

        let user = self.repo.create_user(email, input.name.trim()).await?;
        self.repo.set_password(user.id, phc).await?;
        info!(user_id = %user.id, "user_registered");
        Ok(user)
    }

    /// Check the password and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::BadCredentials)?;
        let stored = self.repo
            .find_password(user.id)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        let parsed = PasswordHash::new(&stored.phc).map_err(|e| AuthError::Hashing(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::BadCredentials);
        }

        let token = token::issue(&self.cfg.jwt_secret, &user, chrono::Duration::hours(self.cfg.token_ttl_hours))?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Verify a bearer token and return its claims.
    pub fn authenticate(&self, bearer: &str) -> Result<Claims, AuthError> {
        token::verify(&self.cfg.jwt_secret, bearer)
    }

    pub async fn current_user(&self, id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(id).await?.ok_or(AuthError::UnknownAccount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc() -> AuthService<MockAuthRepository> {
        AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new("test-secret"))
    }

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), name: "Tester".into(), password: password.into() }
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let err = svc().register(register_input("a@b.com", "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)));
    }

    #[tokio::test]
    async fn register_rejects_bad_email() {
        let err = svc().register(register_input("nope", "LongEnough1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Invalid(_)));
    }

    #[tokio::test]
    async fn register_twice_conflicts() {
        let s = svc();
        s.register(register_input("a@b.com", "LongEnough1")).await.unwrap();
        let err = s.register(register_input("a@b.com", "LongEnough1")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn login_issues_token_for_the_user() {
        let s = svc();
        let user = s.register(register_input("a@b.com", "LongEnough1")).await.unwrap();
        let session = s.login(LoginInput { email: "a@b.com".into(), password: "LongEnough1".into() }).await.unwrap();
        let claims = s.authenticate(&session.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(s.current_user(user.id).await.unwrap(), user);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let s = svc();
        s.register(register_input("a@b.com", "LongEnough1")).await.unwrap();
        let err = s.login(LoginInput { email: "a@b.com".into(), password: "wrong".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }

    #[tokio::test]
    async fn authenticate_rejects_foreign_tokens() {
        let s = svc();
        let user = s.register(register_input("a@b.com", "LongEnough1")).await.unwrap();
        let foreign = token::issue("another-secret", &user, chrono::Duration::hours(1)).unwrap();
        assert!(matches!(s.authenticate(&foreign), Err(AuthError::Token(_))));
    }

    #[tokio::test]
    async fn current_user_of_deleted_account_is_unknown() {
        let err = svc().current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownAccount));
    }

    #[tokio::test]
    async fn login_unknown_user_is_unauthorized() {
        let err = svc().login(LoginInput { email: "ghost@b.com".into(), password: "whatever1".into() }).await.unwrap_err();
        assert!(matches!(err, AuthError::BadCredentials));
    }
}
