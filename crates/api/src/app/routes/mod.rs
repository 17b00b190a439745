use axum::Router;

pub mod customers;
pub mod invoices;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .nest("/api/customers", customers::router())
        .nest("/api/invoices", invoices::router())
}
