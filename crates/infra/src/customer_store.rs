//! Customer repository.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use ledgerly_parties::{ContactInfo, Customer, CustomerId, NewCustomer};

use crate::error::{StoreResult, map_sqlx_error};

/// SQLite-backed customer repository.
#[derive(Debug, Clone)]
pub struct CustomerStore {
    pool: SqlitePool,
}

impl CustomerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all customers in store order.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT id, name, email, phone, address, created_at FROM customers",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_customers", e))?;

        rows.iter().map(customer_from_row).collect()
    }

    /// Insert a validated customer; returns the store-assigned id.
    #[instrument(skip(self, customer), fields(name = customer.name()), err)]
    pub async fn create(&self, customer: &NewCustomer) -> StoreResult<CustomerId> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO customers (name, email, phone, address, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(customer.name())
        .bind(&customer.contact().email)
        .bind(&customer.contact().phone)
        .bind(&customer.contact().address)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(CustomerId::new(result.last_insert_rowid()))
    }

    /// Existence probe, used before linking an invoice to a customer.
    #[instrument(skip(self), err)]
    pub async fn exists(&self, id: CustomerId) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("customer_exists", e))?;
        Ok(count > 0)
    }
}

fn customer_from_row(row: &SqliteRow) -> StoreResult<Customer> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    let email: Option<String> = row
        .try_get("email")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    let phone: Option<String> = row
        .try_get("phone")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    let address: Option<String> = row
        .try_get("address")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| map_sqlx_error("decode_customer", e))?;

    Ok(Customer {
        id: CustomerId::new(id),
        name,
        contact: ContactInfo {
            email,
            phone,
            address,
        },
        created_at,
    })
}
