use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use ledgerly_invoicing::{InvoiceDraft, ItemDraft};
use ledgerly_parties::CustomerId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_invoice).get(list_invoices))
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.invoices.list().await {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateInvoiceRequest>,
) -> axum::response::Response {
    let draft = InvoiceDraft {
        customer_id: body.customer_id.map(CustomerId::new),
        date: body.date.unwrap_or_default(),
        due_date: body.due_date,
        items: body.items.into_iter().map(ItemDraft::from).collect(),
    };

    match services.invoices.create(draft).await {
        Ok(created) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": created.id,
                "invoice_number": created.invoice_number,
                "total": created.total,
                "dropped_items": created.dropped_items,
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
