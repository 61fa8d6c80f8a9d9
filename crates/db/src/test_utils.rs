//! Test utilities for database operations.
//!
//! Integration tests run against an in-memory `SQLite` database with all
//! migrations applied.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::migrations::Migrator;

/// URL of a private in-memory `SQLite` database.
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// A migrated test database.
pub struct TestDatabase {
    /// Database connection.
    pub conn: DatabaseConnection,
}

impl TestDatabase {
    /// Create a fresh in-memory database and run all migrations.
    ///
    /// The pool is pinned to a single connection: every new `SQLite`
    /// in-memory connection would otherwise see its own empty database.
    pub async fn new() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(SQLITE_MEMORY_URL);
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!("Created in-memory test database");

        Ok(Self { conn })
    }

    /// Get the database connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Consume the context and return the connection.
    #[must_use]
    pub fn into_connection(self) -> DatabaseConnection {
        self.conn
    }
}
