//! Create `policies` table.
//! Each row holds one schema-less policy document plus the two reserved fields.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Policies::Table)
                    .if_not_exists()
                    .col(uuid(Policies::Id).primary_key())
                    .col(string_len(Policies::ApplicationNumber, 128).not_null())
                    .col(json_binary(Policies::Document).not_null())
                    .col(timestamp_with_time_zone(Policies::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_policies_application_number")
                    .table(Policies::Table)
                    .col(Policies::ApplicationNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_policies_created_at")
                    .table(Policies::Table)
                    .col(Policies::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_policies_created_at").table(Policies::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_policies_application_number").table(Policies::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Policies::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Policies {
    Table,
    Id,
    ApplicationNumber,
    Document,
    CreatedAt,
}
