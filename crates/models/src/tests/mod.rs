//! Entity tests against a migrated in-memory SQLite database.

use anyhow::Result;
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};
use uuid::Uuid;

use crate::{db, errors::ModelError, password, shop, user};

#[tokio::test]
async fn user_create_and_lookup_by_email() -> Result<()> {
    let db = db::connect_memory().await?;

    let u = user::create(&db, "  bob@example.com ", "Bob").await?;
    assert_eq!(u.email, "bob@example.com");

    let found = user::find_by_email(&db, "bob@example.com").await?;
    assert_eq!(found.map(|f| f.id), Some(u.id));
    Ok(())
}

#[tokio::test]
async fn user_create_rejects_invalid_email() -> Result<()> {
    let db = db::connect_memory().await?;
    let err = user::create(&db, "not-an-email", "Bob").await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_a_db_error() -> Result<()> {
    let db = db::connect_memory().await?;
    user::create(&db, "dup@example.com", "A").await?;
    let err = user::create(&db, "dup@example.com", "B").await.unwrap_err();
    assert!(matches!(err, ModelError::Db(_)));
    Ok(())
}

#[tokio::test]
async fn password_set_twice_keeps_one_row() -> Result<()> {
    let db = db::connect_memory().await?;
    let u = user::create(&db, "cred@example.com", "Cred").await?;

    password::set(&db, u.id, "$argon2id$first".into()).await?;
    let second = password::set(&db, u.id, "$argon2id$second".into()).await?;
    assert_eq!(second.phc, "$argon2id$second");

    assert_eq!(password::Entity::find().all(&db).await?.len(), 1);
    let stored = password::find(&db, u.id).await?.expect("password row");
    assert_eq!(stored.phc, "$argon2id$second");
    Ok(())
}

#[tokio::test]
async fn password_must_be_a_phc_string() -> Result<()> {
    let db = db::connect_memory().await?;
    let u = user::create(&db, "plain@example.com", "Plain").await?;
    let err = password::set(&db, u.id, "hunter22".into()).await.unwrap_err();
    assert!(matches!(err, ModelError::Validation(_)));
    assert!(password::find(&db, u.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn shop_create_keeps_values_as_sent() -> Result<()> {
    let db = db::connect_memory().await?;
    let owner = user::create(&db, "spaces@example.com", "Spaces").await?;

    let input = shop::NewShop { name: Some(" Acme ".into()), email: Some("a@x.com ".into()), phone: Some(" 555".into()), category: None };
    let created = shop::create(&db, owner.id, input).await?;
    let stored = shop::Entity::find_by_id(created.id).one(&db).await?.expect("stored row");
    assert_eq!(stored.name, " Acme ");
    assert_eq!(stored.email, "a@x.com ");
    assert_eq!(stored.phone.as_deref(), Some(" 555"));
    Ok(())
}

#[tokio::test]
async fn shop_create_stamps_defaults_and_links_owner() -> Result<()> {
    let db = db::connect_memory().await?;
    let owner = user::create(&db, "owner@example.com", "Owner").await?;

    let input = shop::NewShop { name: Some("Acme".into()), email: Some("a@x.com".into()), ..Default::default() };
    let created = shop::create(&db, owner.id, input).await?;
    assert_eq!(created.owner, owner.id);
    assert_eq!(created.category, shop::DEFAULT_CATEGORY);
    assert!(created.phone.is_none());

    let owned = owner.find_related(shop::Entity).all(&db).await?;
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, created.id);
    Ok(())
}

#[tokio::test]
async fn shop_create_with_missing_name_writes_nothing() -> Result<()> {
    let db = db::connect_memory().await?;
    let owner = user::create(&db, "none@example.com", "None").await?;

    let input = shop::NewShop { email: Some("a@x.com".into()), ..Default::default() };
    let err = shop::create(&db, owner.id, input).await.unwrap_err();
    assert!(matches!(err, ModelError::Invalid(_)));

    let rows = shop::Entity::find().filter(shop::Column::Owner.eq(owner.id)).all(&db).await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn shop_for_unknown_owner_violates_foreign_key() -> Result<()> {
    let db = db::connect_memory().await?;
    let input = shop::NewShop { name: Some("Ghost".into()), email: Some("g@x.com".into()), ..Default::default() };
    let err = shop::create(&db, Uuid::new_v4(), input).await.unwrap_err();
    assert!(matches!(err, ModelError::Db(_)));
    Ok(())
}
