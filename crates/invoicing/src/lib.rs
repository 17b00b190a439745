//! Invoicing domain module.
//!
//! This crate contains business rules for invoices and their line items,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage): per-item validation, total derivation, and invoice-number
//! formatting.

pub mod invoice;
pub mod number;

pub use invoice::{
    InvoiceDraft, InvoiceId, InvoiceStatus, InvoiceView, ItemDraft, LineItem, ValidInvoice,
};
pub use number::format_invoice_number;
