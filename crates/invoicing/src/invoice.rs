use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerly_core::{DomainError, DomainResult, Entity};
use ledgerly_parties::CustomerId;

/// Invoice identifier (store-assigned rowid).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub i64);

impl InvoiceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Invoice status. Set once to `Draft` at creation; no transition logic
/// exists in the current scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
        }
    }
}

impl core::str::FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "void" => Ok(InvoiceStatus::Void),
            other => Err(DomainError::validation(format!(
                "unknown invoice status: {other}"
            ))),
        }
    }
}

/// A raw line item as submitted by a caller, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// A validated line item with its derived total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

impl LineItem {
    /// Validate a draft item.
    ///
    /// A valid item has a non-blank description, strictly positive quantity
    /// and strictly positive unit price. The line total is always derived
    /// here; any total a caller supplied alongside the draft is ignored.
    pub fn from_draft(draft: ItemDraft) -> Option<Self> {
        let description = draft.description.trim().to_string();
        if description.is_empty() || !(draft.quantity > 0.0) || !(draft.unit_price > 0.0) {
            return None;
        }
        Some(Self {
            description,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total: draft.quantity * draft.unit_price,
        })
    }
}

/// Sum the derived line totals of a set of validated items.
pub fn items_total(items: &[LineItem]) -> f64 {
    items.iter().map(|i| i.total).sum()
}

/// An invoice creation request, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub customer_id: Option<CustomerId>,
    pub date: String,
    pub due_date: Option<String>,
    pub items: Vec<ItemDraft>,
}

impl InvoiceDraft {
    /// Validate the draft into a persistable invoice.
    ///
    /// Items failing the per-item filter are dropped and counted; the total
    /// is derived over the surviving items only. An empty surviving set and
    /// a blank issue date are both validation failures.
    pub fn validate(self) -> DomainResult<ValidInvoice> {
        let date = self.date.trim().to_string();
        if date.is_empty() {
            return Err(DomainError::validation("invoice date is required"));
        }
        let due_date = self
            .due_date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let submitted = self.items.len();
        let items: Vec<LineItem> = self
            .items
            .into_iter()
            .filter_map(LineItem::from_draft)
            .collect();
        if items.is_empty() {
            return Err(DomainError::validation(
                "at least one valid item is required",
            ));
        }

        let total = items_total(&items);
        let dropped_items = submitted - items.len();

        Ok(ValidInvoice {
            customer_id: self.customer_id,
            date,
            due_date,
            total,
            items,
            dropped_items,
        })
    }
}

/// A validated invoice ready for atomic persistence with its items.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidInvoice {
    pub customer_id: Option<CustomerId>,
    pub date: String,
    pub due_date: Option<String>,
    pub total: f64,
    pub items: Vec<LineItem>,
    /// How many submitted items failed the per-item filter.
    pub dropped_items: usize,
}

/// List-view row: an invoice left-joined with its customer's name.
///
/// `customer_name` is absent when no customer is linked. Item details are
/// not part of the list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub customer_id: Option<CustomerId>,
    pub invoice_number: String,
    pub date: String,
    pub due_date: Option<String>,
    pub total: f64,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub customer_name: Option<String>,
}

impl Entity for InvoiceView {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(description: &str, quantity: f64, unit_price: f64) -> ItemDraft {
        ItemDraft {
            description: description.to_string(),
            quantity,
            unit_price,
        }
    }

    fn draft(items: Vec<ItemDraft>) -> InvoiceDraft {
        InvoiceDraft {
            customer_id: Some(CustomerId::new(1)),
            date: "2024-01-01".to_string(),
            due_date: None,
            items,
        }
    }

    #[test]
    fn line_total_is_quantity_times_unit_price() {
        let line = LineItem::from_draft(item("Widget", 2.0, 9.5)).unwrap();
        assert_eq!(line.total, 19.0);
    }

    #[test]
    fn blank_description_fails_the_filter() {
        assert!(LineItem::from_draft(item("   ", 1.0, 1.0)).is_none());
    }

    #[test]
    fn non_positive_quantity_or_price_fails_the_filter() {
        assert!(LineItem::from_draft(item("Widget", 0.0, 1.0)).is_none());
        assert!(LineItem::from_draft(item("Widget", -1.0, 1.0)).is_none());
        assert!(LineItem::from_draft(item("Widget", 1.0, 0.0)).is_none());
        assert!(LineItem::from_draft(item("Widget", 1.0, -0.5)).is_none());
        assert!(LineItem::from_draft(item("Widget", f64::NAN, 1.0)).is_none());
    }

    #[test]
    fn validate_derives_total_over_surviving_items() {
        let valid = draft(vec![
            item("Widget", 2.0, 9.5),
            item("", 1.0, 100.0),
            item("Gadget", 3.0, 2.0),
        ])
        .validate()
        .unwrap();

        assert_eq!(valid.items.len(), 2);
        assert_eq!(valid.dropped_items, 1);
        assert_eq!(valid.total, 19.0 + 6.0);
    }

    #[test]
    fn all_items_invalid_is_a_validation_error() {
        let err = draft(vec![item("", 1.0, 1.0), item("Widget", 0.0, 1.0)])
            .validate()
            .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("item")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn empty_item_list_is_a_validation_error() {
        assert!(draft(vec![]).validate().is_err());
    }

    #[test]
    fn blank_date_is_a_validation_error() {
        let mut d = draft(vec![item("Widget", 1.0, 1.0)]);
        d.date = "  ".to_string();
        let err = d.validate().unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("date")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn blank_due_date_normalizes_to_none() {
        let mut d = draft(vec![item("Widget", 1.0, 1.0)]);
        d.due_date = Some("  ".to_string());
        let valid = d.validate().unwrap();
        assert!(valid.due_date.is_none());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            InvoiceStatus::Draft,
            InvoiceStatus::Sent,
            InvoiceStatus::Paid,
            InvoiceStatus::Void,
        ] {
            assert_eq!(status.as_str().parse::<InvoiceStatus>().unwrap(), status);
        }
        assert!("overdue".parse::<InvoiceStatus>().is_err());
    }

    proptest! {
        /// The invoice total always equals the sum of quantity * unit_price
        /// over the items that pass the filter, no matter what mix of valid
        /// and invalid items was submitted.
        #[test]
        fn total_matches_sum_of_filtered_items(
            items in proptest::collection::vec(
                ("[a-zA-Z ]{0,12}", 0.0f64..100.0, 0.0f64..1000.0),
                1..20,
            )
        ) {
            let drafts: Vec<ItemDraft> = items
                .iter()
                .map(|(d, q, p)| ItemDraft {
                    description: d.clone(),
                    quantity: *q,
                    unit_price: *p,
                })
                .collect();

            let expected: f64 = items
                .iter()
                .filter(|(d, q, p)| !d.trim().is_empty() && *q > 0.0 && *p > 0.0)
                .map(|(_, q, p)| q * p)
                .sum();
            let expected_count = items
                .iter()
                .filter(|(d, q, p)| !d.trim().is_empty() && *q > 0.0 && *p > 0.0)
                .count();

            match draft(drafts).validate() {
                Ok(valid) => {
                    prop_assert_eq!(valid.items.len(), expected_count);
                    prop_assert!((valid.total - expected).abs() < 1e-9);
                }
                Err(_) => prop_assert_eq!(expected_count, 0),
            }
        }
    }
}
