//! Canonical names and destination directories for relocated invoices.

use std::path::PathBuf;

use crate::classifier::{Classification, UNKNOWN_VENDOR};
use crate::config::IntakeConfig;
use crate::sanitize::safe_name_or;

pub const UNKNOWN_DATE: &str = "unknown-date";
pub const NO_INVOICE_NO: &str = "no-invoice-no";

/// `<date>_<vendor>_<invoiceNo>.pdf`, each part sanitized or replaced by its placeholder.
pub fn canonical_filename(classification: &Classification) -> String {
    format!(
        "{}_{}_{}.pdf",
        safe_name_or(&classification.invoice_date, UNKNOWN_DATE),
        safe_name_or(&classification.vendor, UNKNOWN_VENDOR),
        safe_name_or(&classification.invoice_no, NO_INVOICE_NO),
    )
}

/// `<status root>/<vendor>`.
pub fn destination_dir(config: &IntakeConfig, classification: &Classification) -> PathBuf {
    config
        .status_root(classification.status)
        .join(safe_name_or(&classification.vendor, UNKNOWN_VENDOR))
}
