//! Infrastructure layer: SQLite persistence for customers and invoices.
//!
//! Repositories hold a `SqlitePool` and expose async operations returning
//! `StoreResult`. Invoice creation is the only multi-statement write and is
//! wrapped in a single transaction.

pub mod customer_store;
pub mod db;
pub mod error;
pub mod invoice_store;
pub mod schema;

pub use customer_store::CustomerStore;
pub use db::{connect, memory_pool};
pub use error::{StoreError, StoreResult};
pub use invoice_store::{CreatedInvoice, InvoiceStore};
pub use schema::ensure_schema;
