use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ledgerly_core::DomainError;
use ledgerly_infra::StoreError;

/// Map a persistence-layer error onto an HTTP response.
///
/// Validation failures are client errors, missing referents are 404,
/// exhausted invoice-number retries are 409, everything store-level is 500.
pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        StoreError::Domain(DomainError::NotFound) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "customer not found")
        }
        StoreError::Domain(DomainError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg)
        }
        err @ StoreError::Storage { .. } => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
