use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use ledgerly_parties::{ContactInfo, NewCustomer};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(create_customer).get(list_customers))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.customers.list().await {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    let contact = ContactInfo {
        email: body.email,
        phone: body.phone,
        address: body.address,
    };
    let customer = match NewCustomer::new(body.name.unwrap_or_default(), contact) {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e.into()),
    };

    match services.customers.create(&customer).await {
        Ok(id) => (StatusCode::OK, Json(serde_json::json!({ "id": id }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
