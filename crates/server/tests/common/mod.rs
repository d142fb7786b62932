#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::Service;

use server::routes::{self, auth};

pub const SECRET: &str = "test-secret";

pub fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

/// Fresh migrated in-memory database behind the full router.
pub async fn state() -> anyhow::Result<auth::ServerState> {
    let db = models::db::connect_memory().await?;
    Ok(auth::ServerState::new(db, auth::ServerAuthConfig::new(SECRET)))
}

pub async fn build_app() -> anyhow::Result<Router> {
    Ok(routes::build_router(state().await?, cors()))
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
        None => req.body(Body::empty())?,
    };
    let resp = app.clone().call(req).await?;
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

/// Register and log in; returns `(user id, bearer token)`.
pub async fn sign_up(app: &Router, email: &str) -> anyhow::Result<(String, String)> {
    let (status, _) = send(app, "POST", "/api/auth/register", None, Some(json!({"email": email, "name": "Tester", "password": "S3curePass!"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(app, "POST", "/api/auth/login", None, Some(json!({"email": email, "password": "S3curePass!"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let id = body["userId"].as_str().unwrap_or_default().to_string();
    let token = body["token"].as_str().unwrap_or_default().to_string();
    Ok((id, token))
}
