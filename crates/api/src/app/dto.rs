use serde::Deserialize;

use ledgerly_invoicing::ItemDraft;

// -------------------------
// Request DTOs
// -------------------------
//
// Required fields are `Option` or defaulted so an absent field surfaces as a
// domain validation error (400) rather than a deserialization rejection.

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceItemRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
}

impl From<InvoiceItemRequest> for ItemDraft {
    fn from(req: InvoiceItemRequest) -> Self {
        // Any client-supplied per-item `total` is not even deserialized; the
        // server recomputes line totals.
        ItemDraft {
            description: req.description,
            quantity: req.quantity,
            unit_price: req.unit_price,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceItemRequest>,
}
