use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Shop: list-by-owner is always sorted newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_shop_owner_created_at")
                    .table(Shop::Table)
                    .col(Shop::Owner)
                    .col(Shop::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_shop_owner_created_at").table(Shop::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Shop { Table, Owner, CreatedAt }
