//! Connection pool construction.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{StoreResult, map_sqlx_error};

/// Open a pool against `database_url`, creating the database file if needed.
///
/// Foreign key enforcement is switched on per connection (SQLite defaults it
/// off).
pub async fn connect(database_url: &str) -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| map_sqlx_error("parse_database_url", e))?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Single-connection in-memory pool for dev/test.
///
/// An in-memory SQLite database is private to its connection, so the pool is
/// capped at one connection to keep every operation on the same database.
pub async fn memory_pool() -> StoreResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| map_sqlx_error("parse_database_url", e))?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}
