use ledgerly_infra::{CustomerStore, InvoiceStore};
use sqlx::SqlitePool;

/// Repository wiring shared by all handlers (injected via `Extension`).
#[derive(Clone)]
pub struct AppServices {
    pub customers: CustomerStore,
    pub invoices: InvoiceStore,
}

pub fn build_services(pool: SqlitePool) -> AppServices {
    AppServices {
        customers: CustomerStore::new(pool.clone()),
        invoices: InvoiceStore::new(pool),
    }
}
