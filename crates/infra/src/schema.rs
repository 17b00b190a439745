//! Relational schema bootstrap.
//!
//! Creation is idempotent (`CREATE TABLE IF NOT EXISTS`) so repeated startup
//! neither fails nor duplicates tables. There is no migration system; the
//! schema is fixed at these three tables.

use sqlx::sqlite::SqlitePool;

use crate::error::{StoreResult, map_sqlx_error};

const CUSTOMERS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT,
    phone       TEXT,
    address     TEXT,
    created_at  TEXT NOT NULL
)
"#;

const INVOICES_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id     INTEGER REFERENCES customers(id),
    invoice_number  TEXT NOT NULL UNIQUE,
    date            TEXT NOT NULL,
    due_date        TEXT,
    total           REAL NOT NULL DEFAULT 0,
    status          TEXT NOT NULL DEFAULT 'draft',
    created_at      TEXT NOT NULL
)
"#;

const INVOICE_ITEMS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS invoice_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_id  INTEGER NOT NULL REFERENCES invoices(id),
    description TEXT NOT NULL,
    quantity    REAL NOT NULL,
    unit_price  REAL NOT NULL,
    total       REAL NOT NULL
)
"#;

/// Create the three tables if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> StoreResult<()> {
    for ddl in [CUSTOMERS_DDL, INVOICES_DDL, INVOICE_ITEMS_DDL] {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}
