//! Create communities table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Communities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Communities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Communities::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Communities::Description).text())
                    .col(ColumnDef::new(Communities::AvatarUrl).string_len(500))
                    .col(
                        ColumnDef::new(Communities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Communities::PublicationCount)
                            .integer()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: name
        manager
            .create_index(
                Index::create()
                    .name("idx_communities_name")
                    .table(Communities::Table)
                    .col(Communities::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: publication_count (for most-popular listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_communities_publication_count")
                    .table(Communities::Table)
                    .col(Communities::PublicationCount)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Communities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Communities {
    Table,
    Id,
    Name,
    Description,
    AvatarUrl,
    CreatedAt,
    PublicationCount,
}
