//! Human-facing invoice number formatting.
//!
//! The sequence itself must come from a source serialized with the invoice
//! insert (the store derives it inside the same transaction); wall-clock
//! derivation is not collision-safe and is deliberately not offered here.

/// Format a sequence number as a human-facing invoice number.
pub fn format_invoice_number(seq: i64) -> String {
    format!("INV-{seq:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_six_digits() {
        assert_eq!(format_invoice_number(1), "INV-000001");
        assert_eq!(format_invoice_number(4321), "INV-004321");
    }

    #[test]
    fn does_not_truncate_large_sequences() {
        assert_eq!(format_invoice_number(1_234_567), "INV-1234567");
    }

    #[test]
    fn distinct_sequences_give_distinct_numbers() {
        let a = format_invoice_number(7);
        let b = format_invoice_number(8);
        assert_ne!(a, b);
    }
}
