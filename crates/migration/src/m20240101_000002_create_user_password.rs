//! Create `user_password`: at most one password per user, keyed by the user id.
//! The stored value is a PHC string, so the hashing scheme travels with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(UserPassword::Table)
            .if_not_exists()
            .col(uuid(UserPassword::UserId).primary_key())
            .col(text(UserPassword::Phc))
            .col(timestamp_with_time_zone(UserPassword::ChangedAt))
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_password_user")
                    .from(UserPassword::Table, UserPassword::UserId)
                    .to(User::Table, User::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserPassword::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserPassword {
    Table,
    UserId,
    Phc,
    ChangedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
