//! Create `shop` table.
//! Each row belongs to exactly one user through `owner`; removing the user removes its shops.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shop::Table)
                    .if_not_exists()
                    .col(uuid(Shop::Id).primary_key())
                    .col(uuid(Shop::Owner).not_null())
                    .col(string_len(Shop::Name, 255).not_null())
                    .col(string_len(Shop::Email, 255).not_null())
                    .col(string_len_null(Shop::Phone, 64))
                    .col(string_len(Shop::Category, 64).not_null().default("successful"))
                    .col(timestamp_with_time_zone(Shop::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shop_owner")
                            .from(Shop::Table, Shop::Owner)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Shop::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Shop {
    Table,
    Id,
    Owner,
    Name,
    Email,
    Phone,
    Category,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
