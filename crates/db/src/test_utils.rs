//! Helpers for tests that need a real `PostgreSQL` instance.
//!
//! Connection settings come from `TEST_DB_HOST`, `TEST_DB_PORT`,
//! `TEST_DB_USER`, `TEST_DB_PASSWORD` and `TEST_DB_NAME`.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;

/// Tables emptied by [`TestDatabase::cleanup`]. `roles` is seeded by a
/// migration and stays.
const DATA_TABLES: &[&str] = &[
    "likes",
    "comments",
    "subscriptions",
    "posts",
    "topics",
    "communities",
    "users",
];

/// Where the test database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

impl TestDbConfig {
    /// Read settings from the environment, falling back to a local instance.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env_or("TEST_DB_HOST", "localhost"),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: env_or("TEST_DB_USER", "agora_test"),
            password: env_or("TEST_DB_PASSWORD", "agora_test"),
            database: env_or("TEST_DB_NAME", "agora_test"),
        }
    }

    /// Connection URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// A migrated test database.
pub struct TestDatabase {
    conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Connect using [`TestDbConfig::from_env`] and run all migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(&TestDbConfig::from_env()).await
    }

    /// Connect to `config` and run all migrations.
    pub async fn with_config(config: &TestDbConfig) -> Result<Self, DbErr> {
        let conn = Database::connect(config.url()).await?;
        Migrator::up(&conn, None).await?;

        tracing::info!(database = %config.database, "Connected to test database");
        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Borrow the connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Shared handle, as repositories take it.
    #[must_use]
    pub fn shared(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Empty every data table and restart id sequences.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        self.conn
            .execute(Statement::from_string(
                self.conn.get_database_backend(),
                truncate_statement(),
            ))
            .await?;
        Ok(())
    }
}

fn truncate_statement() -> String {
    let tables = DATA_TABLES
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("TRUNCATE TABLE {tables} RESTART IDENTITY CASCADE")
}
