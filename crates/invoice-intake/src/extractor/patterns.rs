//! Label-anchored patterns for invoice fields.
//!
//! Best-effort heuristics: a miss leaves the field empty and downstream
//! classification decides what to do with it.

use std::sync::LazyLock;

use regex::Regex;

use super::ExtractedFields;

static RE_INVOICE_NO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Invoice\s*(?:Number|No\.?)\s*[:#]?\s*([A-Z0-9-]+)").unwrap()
});
static RE_INVOICE_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Invoice\s*#\s*([A-Z0-9-]+)").unwrap());
static RE_INVOICE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Invoice Date|Date)\s*:?\s*([0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{2,4})")
        .unwrap()
});
static RE_TOTAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Total|Amount Due|Balance Due)\s*[:$]?\s*\$?\s*([0-9,]+\.\d{2})").unwrap()
});
static RE_VENDOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Vendor\s*:?\s*([A-Za-z0-9 &.,-]{2,})").unwrap());

/// Collapses every whitespace run (including newlines) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First captured group of the first pattern that matches, trimmed.
fn pick(patterns: &[&Regex], text: &str) -> String {
    patterns
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Applies the field patterns to document text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let text = collapse_whitespace(text);

    ExtractedFields {
        invoice_no: pick(&[&RE_INVOICE_NO, &RE_INVOICE_HASH], &text),
        invoice_date: pick(&[&RE_INVOICE_DATE], &text),
        total: pick(&[&RE_TOTAL], &text),
        vendor: pick(&[&RE_VENDOR], &text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_invoice_line() {
        let fields =
            extract_fields("Invoice Number: INV-55 Invoice Date: 02/13/2026 Total: $123.45");
        assert_eq!(fields.invoice_no, "INV-55");
        assert_eq!(fields.invoice_date, "02/13/2026");
        assert_eq!(fields.total, "123.45");
        assert_eq!(fields.vendor, "");
    }

    #[test]
    fn test_invoice_number_label_variants() {
        assert_eq!(extract_fields("Invoice No. A-1").invoice_no, "A-1");
        assert_eq!(extract_fields("INVOICE NO: 2026-7").invoice_no, "2026-7");
        assert_eq!(extract_fields("Invoice # X99").invoice_no, "X99");
        assert_eq!(extract_fields("Invoice#X99").invoice_no, "X99");
    }

    #[test]
    fn test_text_spread_over_lines() {
        let text = "ACME LTD\n\nInvoice\nNumber:\n  INV-9\nDate:\t1.2.26\n";
        let fields = extract_fields(text);
        assert_eq!(fields.invoice_no, "INV-9");
        assert_eq!(fields.invoice_date, "1.2.26");
    }

    #[test]
    fn test_date_separators() {
        assert_eq!(extract_fields("Date: 13-02-2026").invoice_date, "13-02-2026");
        assert_eq!(extract_fields("Invoice Date 3/4/26").invoice_date, "3/4/26");
        assert_eq!(extract_fields("Date: February 13").invoice_date, "");
    }

    #[test]
    fn test_total_label_variants() {
        assert_eq!(extract_fields("Amount Due: $1,250.00").total, "1,250.00");
        assert_eq!(extract_fields("Balance Due 99.10").total, "99.10");
        assert_eq!(extract_fields("TOTAL $ 5.00").total, "5.00");
    }

    #[test]
    fn test_total_requires_two_decimals() {
        assert_eq!(extract_fields("Total: 120").total, "");
        assert_eq!(extract_fields("Total: 12.5").total, "");
    }

    #[test]
    fn test_vendor_label() {
        let fields = extract_fields("Vendor: Acme & Sons, Inc. Invoice # 12");
        assert_eq!(fields.vendor, "Acme & Sons, Inc. Invoice");
        assert_eq!(extract_fields("Vendor:").vendor, "");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(extract_fields(""), ExtractedFields::default());
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}
