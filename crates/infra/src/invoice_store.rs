//! Invoice repository.
//!
//! Invoice creation persists the invoice row and all its item rows inside
//! one transaction: either everything commits or nothing is observable. The
//! invoice number is derived from a sequence read inside that same
//! transaction, with the UNIQUE constraint as backstop; a collision with a
//! concurrent insert triggers exactly one regenerate-and-retry cycle.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::instrument;

use ledgerly_core::DomainError;
use ledgerly_invoicing::{
    format_invoice_number, InvoiceDraft, InvoiceId, InvoiceStatus, InvoiceView, ValidInvoice,
};
use ledgerly_parties::CustomerId;

use crate::error::{StoreError, StoreResult, is_unique_violation, map_sqlx_error};

/// Outcome of a successful invoice creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedInvoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub total: f64,
    /// How many submitted items failed the per-item filter and were not
    /// persisted.
    pub dropped_items: usize,
}

/// SQLite-backed invoice repository.
#[derive(Debug, Clone)]
pub struct InvoiceStore {
    pool: SqlitePool,
}

impl InvoiceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List every invoice left-joined with its customer's name.
    #[instrument(skip(self), err)]
    pub async fn list(&self) -> StoreResult<Vec<InvoiceView>> {
        let rows = sqlx::query(
            "SELECT i.id, i.customer_id, i.invoice_number, i.date, i.due_date, \
                    i.total, i.status, i.created_at, c.name AS customer_name \
             FROM invoices i \
             LEFT JOIN customers c ON i.customer_id = c.id \
             ORDER BY i.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_invoices", e))?;

        rows.iter().map(view_from_row).collect()
    }

    /// Validate and atomically persist an invoice with its line items.
    #[instrument(skip(self, draft), fields(items = draft.items.len()), err)]
    pub async fn create(&self, draft: InvoiceDraft) -> StoreResult<CreatedInvoice> {
        let invoice = draft.validate()?;

        if let Some(customer_id) = invoice.customer_id {
            if !self.customer_exists(customer_id).await? {
                return Err(DomainError::not_found().into());
            }
        }

        match self.insert(&invoice).await {
            Err(StoreError::Domain(DomainError::Conflict(_))) => self.insert(&invoice).await,
            other => other,
        }
    }

    async fn customer_exists(&self, id: CustomerId) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?1")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("customer_exists", e))?;
        Ok(count > 0)
    }

    async fn insert(&self, invoice: &ValidInvoice) -> StoreResult<CreatedInvoice> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Next sequence, read from the issued numbers themselves inside the
        // same transaction as the insert. A row committed by a concurrent
        // writer between the read and the insert trips the UNIQUE constraint
        // and also raises this maximum, so the retry picks a fresh number.
        let seq: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(CAST(SUBSTR(invoice_number, 5) AS INTEGER)), 0) + 1 \
             FROM invoices",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("next_invoice_sequence", e))?;
        let invoice_number = format_invoice_number(seq);
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO invoices (customer_id, invoice_number, date, due_date, total, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(invoice.customer_id.map(CustomerId::as_i64))
        .bind(&invoice_number)
        .bind(&invoice.date)
        .bind(&invoice.due_date)
        .bind(invoice.total)
        .bind(InvoiceStatus::Draft.as_str())
        .bind(created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Domain(DomainError::conflict(format!(
                    "invoice number {invoice_number} already exists"
                )))
            } else {
                map_sqlx_error("insert_invoice", e)
            }
        })?;
        let id = InvoiceId::new(result.last_insert_rowid());

        for item in &invoice.items {
            sqlx::query(
                "INSERT INTO invoice_items (invoice_id, description, quantity, unit_price, total) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(id.as_i64())
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.total)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_invoice_item", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(CreatedInvoice {
            id,
            invoice_number,
            total: invoice.total,
            dropped_items: invoice.dropped_items,
        })
    }
}

fn view_from_row(row: &SqliteRow) -> StoreResult<InvoiceView> {
    let decode = |e| map_sqlx_error("decode_invoice", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let customer_id: Option<i64> = row.try_get("customer_id").map_err(decode)?;
    let invoice_number: String = row.try_get("invoice_number").map_err(decode)?;
    let date: String = row.try_get("date").map_err(decode)?;
    let due_date: Option<String> = row.try_get("due_date").map_err(decode)?;
    let total: f64 = row.try_get("total").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;
    let customer_name: Option<String> = row.try_get("customer_name").map_err(decode)?;

    let status: InvoiceStatus = status
        .parse()
        .map_err(|e: DomainError| StoreError::storage("decode_invoice", e.to_string()))?;

    Ok(InvoiceView {
        id: InvoiceId::new(id),
        customer_id: customer_id.map(CustomerId::new),
        invoice_number,
        date,
        due_date,
        total,
        status,
        created_at,
        customer_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer_store::CustomerStore;
    use crate::db::memory_pool;
    use crate::schema::ensure_schema;
    use ledgerly_invoicing::ItemDraft;
    use ledgerly_parties::{ContactInfo, NewCustomer};

    async fn setup() -> (SqlitePool, CustomerStore, InvoiceStore) {
        let pool = memory_pool().await.unwrap();
        ensure_schema(&pool).await.unwrap();
        (
            pool.clone(),
            CustomerStore::new(pool.clone()),
            InvoiceStore::new(pool),
        )
    }

    fn widget(quantity: f64, unit_price: f64) -> ItemDraft {
        ItemDraft {
            description: "Widget".to_string(),
            quantity,
            unit_price,
        }
    }

    fn draft(customer_id: Option<CustomerId>, items: Vec<ItemDraft>) -> InvoiceDraft {
        InvoiceDraft {
            customer_id,
            date: "2024-01-01".to_string(),
            due_date: None,
            items,
        }
    }

    async fn acme(customers: &CustomerStore) -> CustomerId {
        customers
            .create(&NewCustomer::new("Acme", ContactInfo::default()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_persists_invoice_with_items_and_total() {
        let (pool, customers, invoices) = setup().await;
        let customer_id = acme(&customers).await;

        let created = invoices
            .create(draft(Some(customer_id), vec![widget(2.0, 9.5)]))
            .await
            .unwrap();
        assert_eq!(created.total, 19.0);
        assert_eq!(created.dropped_items, 0);
        assert_eq!(created.invoice_number, "INV-000001");

        let item_totals: Vec<f64> =
            sqlx::query_scalar("SELECT total FROM invoice_items WHERE invoice_id = ?1")
                .bind(created.id.as_i64())
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(item_totals, vec![19.0]);

        let views = invoices.list().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id, created.id);
        assert_eq!(views[0].total, 19.0);
        assert_eq!(views[0].status, InvoiceStatus::Draft);
        assert_eq!(views[0].customer_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn invalid_items_are_dropped_and_reported() {
        let (_pool, _customers, invoices) = setup().await;

        let created = invoices
            .create(draft(
                None,
                vec![
                    widget(2.0, 9.5),
                    ItemDraft {
                        description: String::new(),
                        quantity: 1.0,
                        unit_price: 100.0,
                    },
                ],
            ))
            .await
            .unwrap();

        assert_eq!(created.dropped_items, 1);
        assert_eq!(created.total, 19.0);
    }

    #[tokio::test]
    async fn all_invalid_items_leaves_nothing_behind() {
        let (_pool, _customers, invoices) = setup().await;

        let err = invoices
            .create(draft(None, vec![widget(0.0, 9.5)]))
            .await
            .unwrap_err();
        match err {
            StoreError::Domain(DomainError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(invoices.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn item_insert_failure_rolls_back_the_invoice_row() {
        let (pool, _customers, invoices) = setup().await;

        // Force the second statement of the transaction to fail.
        sqlx::query("DROP TABLE invoice_items")
            .execute(&pool)
            .await
            .unwrap();

        let err = invoices
            .create(draft(None, vec![widget(1.0, 5.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Storage { .. }));
        assert!(invoices.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unlinked_invoice_lists_with_null_customer_name() {
        let (_pool, _customers, invoices) = setup().await;

        invoices
            .create(draft(None, vec![widget(1.0, 5.0)]))
            .await
            .unwrap();

        let views = invoices.list().await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(views[0].customer_id.is_none());
        assert!(views[0].customer_name.is_none());
    }

    #[tokio::test]
    async fn unknown_customer_is_rejected() {
        let (_pool, _customers, invoices) = setup().await;

        let err = invoices
            .create(draft(Some(CustomerId::new(42)), vec![widget(1.0, 5.0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound)));
        assert!(invoices.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invoice_numbers_are_unique_across_creates() {
        let (_pool, _customers, invoices) = setup().await;

        let mut numbers = Vec::new();
        for _ in 0..5 {
            let created = invoices
                .create(draft(None, vec![widget(1.0, 5.0)]))
                .await
                .unwrap();
            numbers.push(created.invoice_number);
        }

        let mut deduped = numbers.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), numbers.len());
    }

    #[tokio::test]
    async fn sequence_follows_highest_issued_number() {
        let (pool, _customers, invoices) = setup().await;

        invoices
            .create(draft(None, vec![widget(1.0, 5.0)]))
            .await
            .unwrap();

        // A row committed by another writer with a higher number must push
        // the sequence past it, never onto it.
        sqlx::query(
            "INSERT INTO invoices (customer_id, invoice_number, date, due_date, total, status, created_at) \
             VALUES (NULL, 'INV-000051', '2024-01-01', NULL, 0, 'draft', '2024-01-01T00:00:00Z')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let created = invoices
            .create(draft(None, vec![widget(1.0, 5.0)]))
            .await
            .unwrap();
        assert_eq!(created.invoice_number, "INV-000052");
    }
}
