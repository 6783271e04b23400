//! Seed the static roles.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `(id, name)` pairs; ids are referenced from code as constants.
const ROLES: [(i32, &str); 2] = [(1, "admin"), (2, "user")];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Roles::Table)
            .columns([Roles::Id, Roles::Name])
            .on_conflict(OnConflict::column(Roles::Id).do_nothing().to_owned());

        for (id, name) in ROLES {
            insert
                .values([id.into(), name.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(insert).await?;

        // Explicit ids bypass the serial sequence
        manager
            .get_connection()
            .execute_unprepared(
                "SELECT setval(pg_get_serial_sequence('roles', 'id'), (SELECT MAX(id) FROM roles))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Id).is_in(ROLES.map(|(id, _)| id)))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
}
