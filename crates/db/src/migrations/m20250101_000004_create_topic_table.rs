//! Create topics table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Topics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Topics::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Topics::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Topics::IconUrl).string_len(500))
                    .to_owned(),
            )
            .await?;

        // Index: name (for lookup by name)
        manager
            .create_index(
                Index::create()
                    .name("idx_topics_name")
                    .table(Topics::Table)
                    .col(Topics::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Topics::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Topics {
    Table,
    Id,
    Name,
    IconUrl,
}
