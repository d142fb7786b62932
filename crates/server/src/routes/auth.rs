use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, CookieJar, SameSite},
    WithRejection,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use service::auth::{
    domain::{LoginInput, RegisterInput},
    errors::AuthError,
    repo::seaorm::SeaOrmAuthRepository,
    repository::AuthRepository,
    service::{AuthConfig, AuthService},
};
use service::shop::{SeaOrmShopRepository, ShopRepository, ShopService};

use crate::errors::JsonApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub secure_cookie: bool,
}

impl ServerAuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self { jwt_secret: jwt_secret.into(), token_ttl_hours: 12, secure_cookie: false }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub auth_svc: Arc<AuthService<dyn AuthRepository>>,
    pub shops: Arc<ShopService<dyn ShopRepository>>,
}

impl ServerState {
    /// Wire SeaORM repositories over `db`.
    pub fn new(db: DatabaseConnection, auth: ServerAuthConfig) -> Self {
        let auth_repo: Arc<dyn AuthRepository> = Arc::new(SeaOrmAuthRepository { db: db.clone() });
        let shop_repo: Arc<dyn ShopRepository> = Arc::new(SeaOrmShopRepository { db: db.clone() });
        let auth_cfg = AuthConfig {
            jwt_secret: auth.jwt_secret.clone(),
            token_ttl_hours: auth.token_ttl_hours,
        };
        Self {
            db,
            auth_svc: Arc::new(AuthService::new(auth_repo, auth_cfg)),
            shops: Arc::new(ShopService::new(shop_repo)),
            auth,
        }
    }

    /// Replace the shop storage, keeping everything else.
    pub fn with_shop_repository(mut self, repo: Arc<dyn ShopRepository>) -> Self {
        self.shops = Arc::new(ShopService::new(repo));
        self
    }
}

/// Identity established by [`require_auth`]; handlers receive it explicitly.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| JsonApiError::unauthorized("No token, authorization denied"))
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOutput { pub user_id: Uuid }

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeOutput { pub user_id: Uuid, pub email: String, pub name: String }

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput { pub user_id: Uuid, pub email: String, pub name: String, pub token: String }

fn auth_error(e: AuthError) -> JsonApiError {
    match e {
        AuthError::Invalid(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
        AuthError::EmailTaken => JsonApiError::new(StatusCode::CONFLICT, "User already exists", None),
        AuthError::BadCredentials | AuthError::UnknownAccount | AuthError::Token(_) => JsonApiError::unauthorized("Invalid credentials"),
        AuthError::Hashing(_) | AuthError::Storage(_) => {
            error!(err = %e, "auth operation failed");
            JsonApiError::server_error()
        }
    }
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Registered", body = RegisterOutput), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc), (status = 409, description = "Conflict", body = crate::openapi::ErrorDoc)))]
pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(input), _): WithRejection<Json<RegisterInput>, JsonApiError>,
) -> Result<Json<RegisterOutput>, JsonApiError> {
    let user = state.auth_svc.register(input).await.map_err(auth_error)?;
    Ok(Json(RegisterOutput { user_id: user.id }))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = LoginOutput), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, JsonApiError>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth_svc.login(input).await.map_err(auth_error)?;
    let user = session.user;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(state.auth.secure_cookie);
    cookie.set_same_site(SameSite::Lax);
    let jar = jar.add(cookie);
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token: session.token };
    Ok((jar, Json(out)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/api/auth/me", tag = "auth", responses((status = 200, description = "Current user", body = MeOutput), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)))]
pub async fn me(State(state): State<ServerState>, user: CurrentUser) -> Result<Json<MeOutput>, JsonApiError> {
    let found = state.auth_svc.current_user(user.id).await.map_err(auth_error)?;
    Ok(Json(MeOutput { user_id: found.id, email: found.email, name: found.name }))
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
fn bearer_token(req: &Request) -> Result<Option<String>, JsonApiError> {
    if let Some(h) = req.headers().get(axum::http::header::AUTHORIZATION) {
        let value = h.to_str().unwrap_or_default();
        return match value.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(Some(t.trim().to_string())),
            _ => {
                warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
                Err(JsonApiError::unauthorized("Token is not valid"))
            }
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Resolve the caller identity or reject with 401 before any handler runs.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let Some(tok) = bearer_token(&req)? else {
        warn!(path = %req.uri().path(), "missing Authorization header and auth_token cookie");
        return Err(JsonApiError::unauthorized("No token, authorization denied"));
    };

    let id = state
        .auth_svc
        .authenticate(&tok)
        .and_then(|claims| claims.user_id())
        .map_err(|e| {
            warn!(path = %req.uri().path(), err = %e, "token validation failed");
            JsonApiError::unauthorized("Token is not valid")
        })?;

    req.extensions_mut().insert(CurrentUser { id });
    Ok(next.run(req).await)
}
