//! Persistence for agora: sea-orm entities, migrations and repositories.
//!
//! Repositories map store failures through [`map_db_err`], so constraint
//! violations arrive at the services as `Conflict` or `NotFound`.

pub mod entities;
pub mod error;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

pub use error::map_db_err;

use std::time::Duration;

use agora_common::{AppResult, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::log::LevelFilter;

/// Open the connection pool described by `config.database`.
pub async fn init(config: &Config) -> AppResult<DatabaseConnection> {
    let settings = &config.database;
    let mut options = ConnectOptions::new(settings.url.as_str());

    options
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    let conn = Database::connect(options).await.map_err(map_db_err)?;
    tracing::debug!(
        max_connections = settings.max_connections,
        "Database pool ready"
    );
    Ok(conn)
}

/// Apply pending migrations, seeding the fixed roles on first run.
pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    migrations::Migrator::up(db, None)
        .await
        .map_err(map_db_err)
}
