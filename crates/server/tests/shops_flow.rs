mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use service::auth::{domain::AuthUser, token};
use service::shop::repository::mock::MockShopRepository;
use server::routes;

use common::{build_app, cors, send, sign_up, state, SECRET};

#[tokio::test]
async fn test_owner_lifecycle_scenario() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (alice, alice_token) = sign_up(&app, "alice@example.com").await?;
    let (_, bob_token) = sign_up(&app, "bob@example.com").await?;

    let (status, created) = send(&app, "POST", "/api/shops", Some(&alice_token), Some(json!({"name": "Acme", "email": "a@x.com"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["category"], "successful");
    assert_eq!(created["owner"], alice);
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&app, "POST", "/api/shops", Some(&alice_token), Some(json!({"name": "", "email": "b@x.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "name");

    let (status, updated) = send(&app, "PUT", &format!("/api/shops/{id}"), Some(&alice_token), Some(json!({"phone": "555"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "555");
    assert_eq!(updated["name"], "Acme");
    assert_eq!(updated["email"], "a@x.com");
    assert_eq!(updated["category"], "successful");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, body) = send(&app, "DELETE", &format!("/api/shops/{id}"), Some(&bob_token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authorized");

    let (status, listed) = send(&app, "GET", "/api/shops", Some(&alice_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0], updated);
    Ok(())
}

#[tokio::test]
async fn test_listed_fields_match_what_was_sent() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (owner, t) = sign_up(&app, "exact@example.com").await?;

    let sent = json!({"name": " Acme ", "email": "a@x.com ", "phone": " 555", "category": "corner shop"});
    let (status, created) = send(&app, "POST", "/api/shops", Some(&t), Some(sent.clone())).await?;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, "GET", "/api/shops", Some(&t), None).await?;
    let row = &listed[0];
    for field in ["name", "email", "phone", "category"] {
        assert_eq!(row[field], sent[field], "field {field}");
    }
    assert_eq!(row["owner"], owner);
    assert_eq!(row["id"], created["id"]);
    assert_eq!(row["createdAt"], created["createdAt"]);
    Ok(())
}

#[tokio::test]
async fn test_wrongly_typed_body_gets_json_validation_error() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, t) = sign_up(&app, "typed@example.com").await?;

    let (status, body) = send(&app, "POST", "/api/shops", Some(&t), Some(json!({"name": 123, "email": "a@x.com"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    assert_eq!(body["errors"][0]["field"], "body");

    let (_, created) = send(&app, "POST", "/api/shops", Some(&t), Some(json!({"name": "Acme", "email": "a@x.com"}))).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();
    let (status, body) = send(&app, "PUT", &format!("/api/shops/{id}"), Some(&t), Some(json!({"phone": false}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "body");

    let (_, listed) = send(&app, "GET", "/api/shops", Some(&t), None).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["phone"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn test_owner_in_body_is_ignored() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (alice, alice_token) = sign_up(&app, "alice@example.com").await?;
    let (bob, bob_token) = sign_up(&app, "bob@example.com").await?;

    let body = json!({"name": "Sneaky", "email": "s@x.com", "owner": bob, "user": bob, "type": "retail"});
    let (status, created) = send(&app, "POST", "/api/shops", Some(&alice_token), Some(body)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["owner"], alice);
    assert_eq!(created["category"], "retail");

    let (_, bobs) = send(&app, "GET", "/api/shops", Some(&bob_token), None).await?;
    assert_eq!(bobs.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_list_is_newest_first() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, t) = sign_up(&app, "order@example.com").await?;
    send(&app, "POST", "/api/shops", Some(&t), Some(json!({"name": "Old", "email": "o@x.com"}))).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    send(&app, "POST", "/api/shops", Some(&t), Some(json!({"name": "New", "email": "n@x.com"}))).await?;

    let (_, listed) = send(&app, "GET", "/api/shops", Some(&t), None).await?;
    assert_eq!(listed[0]["name"], "New");
    assert_eq!(listed[1]["name"], "Old");
    Ok(())
}

#[tokio::test]
async fn test_missing_token_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (status, body) = send(&app, "GET", "/api/shops", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token, authorization denied");

    let (status, _) = send(&app, "POST", "/api/shops", None, Some(json!({"name": "Acme", "email": "a@x.com"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_expired_or_forged_token_is_rejected() -> anyhow::Result<()> {
    let app = build_app().await?;
    let user = AuthUser { id: Uuid::new_v4(), email: "ghost@example.com".into(), name: "Ghost".into() };

    let expired = token::issue(SECRET, &user, chrono::Duration::hours(-2))?;
    let (status, body) = send(&app, "GET", "/api/shops", Some(&expired), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is not valid");

    let forged = token::issue("some-other-secret", &user, chrono::Duration::hours(1))?;
    let (status, _) = send(&app, "GET", "/api/shops", Some(&forged), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_unknown_id_is_not_found_for_any_caller() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, t) = sign_up(&app, "nf@example.com").await?;

    let missing = Uuid::new_v4();
    let (status, body) = send(&app, "PUT", &format!("/api/shops/{missing}"), Some(&t), Some(json!({"name": "X"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Shop not found");

    let (status, _) = send(&app, "DELETE", &format!("/api/shops/{missing}"), Some(&t), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/shops/not-a-uuid", Some(&t), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_non_owner_update_leaves_record_unchanged() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, alice_token) = sign_up(&app, "alice@example.com").await?;
    let (_, bob_token) = sign_up(&app, "bob@example.com").await?;

    let (_, created) = send(&app, "POST", "/api/shops", Some(&alice_token), Some(json!({"name": "Acme", "email": "a@x.com"}))).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, _) = send(&app, "PUT", &format!("/api/shops/{id}"), Some(&bob_token), Some(json!({"name": "Hijacked"}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, listed) = send(&app, "GET", "/api/shops", Some(&alice_token), None).await?;
    assert_eq!(listed[0]["name"], "Acme");
    Ok(())
}

#[tokio::test]
async fn test_owner_delete_removes_record() -> anyhow::Result<()> {
    let app = build_app().await?;
    let (_, t) = sign_up(&app, "del@example.com").await?;
    let (_, created) = send(&app, "POST", "/api/shops", Some(&t), Some(json!({"name": "Acme", "email": "a@x.com"}))).await?;
    let id = created["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = send(&app, "DELETE", &format!("/api/shops/{id}"), Some(&t), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shop removed");

    let (_, listed) = send(&app, "GET", "/api/shops", Some(&t), None).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn test_storage_failure_is_opaque_server_error() -> anyhow::Result<()> {
    let repo = Arc::new(MockShopRepository::default());
    repo.break_storage();
    let state = state().await?.with_shop_repository(repo);
    let app = routes::build_router(state, cors());
    let (_, t) = sign_up(&app, "broken@example.com").await?;

    let (status, body) = send(&app, "GET", "/api/shops", Some(&t), None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Server Error"}));
    Ok(())
}
