//! Database layer for schoolboard.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use schoolboard_common::{AppError, Config, config::DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Pool ceiling for `SQLite` files, which allow a single writer at a time.
const SQLITE_MAX_CONNECTIONS: u32 = 4;

/// Pool bounds `(max, min)` for the configured database.
#[must_use]
pub fn pool_bounds(config: &DatabaseConfig) -> (u32, u32) {
    let max = if is_sqlite(&config.url) {
        config.max_connections.clamp(1, SQLITE_MAX_CONNECTIONS)
    } else {
        config.max_connections.max(1)
    };
    (max, config.min_connections.min(max))
}

fn is_sqlite(url: &str) -> bool {
    url.starts_with("sqlite:")
}

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let (max_connections, min_connections) = pool_bounds(&config.database);
    let sqlite = is_sqlite(&config.database.url);

    let mut opt = ConnectOptions::new(&config.database.url);
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(5))
        // Writers queue on the SQLite file lock.
        .acquire_timeout(Duration::from_secs(if sqlite { 30 } else { 10 }))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    let backend = if sqlite { "sqlite" } else { "postgres" };
    tracing::info!(
        backend,
        max_connections,
        "Connecting to database"
    );

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}
