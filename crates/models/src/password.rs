//! Stored password of a user, as an argon2 PHC string.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, Set};
use uuid::Uuid;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_password")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// `$argon2id$v=19$...`; never leaves the service layer.
    pub phc: String,
    pub changed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(user_id).one(db).await?)
}

/// Insert or replace the password of `user_id` in one statement.
pub async fn set(db: &DatabaseConnection, user_id: Uuid, phc: String) -> Result<Model, ModelError> {
    if !phc.starts_with('$') {
        return Err(ModelError::Validation("password must be stored as a PHC string".into()));
    }
    let row = ActiveModel { user_id: Set(user_id), phc: Set(phc), changed_at: Set(Utc::now().into()) };
    Entity::insert(row)
        .on_conflict(
            OnConflict::column(Column::UserId)
                .update_columns([Column::Phc, Column::ChangedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    find(db, user_id)
        .await?
        .ok_or_else(|| ModelError::Db(format!("password row for {user_id} vanished after upsert")))
}
