//! Decides between success and needs-review from extracted and fallback fields.

use chrono::NaiveDate;

use crate::extractor::ExtractedFields;
use crate::heuristics::FilenameGuess;
use crate::record::IntakeStatus;
use crate::sanitize;

/// Extracted vendor names longer than this are assumed to be mis-captures.
pub const MAX_VENDOR_CHARS: usize = 60;

/// Number of empty key fields that sends a record to review.
pub const MISSING_FIELD_THRESHOLD: usize = 2;

pub const UNKNOWN_VENDOR: &str = "UnknownVendor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Sanitized and never empty.
    pub vendor: String,
    pub invoice_no: String,
    /// `YYYY-MM-DD` or empty.
    pub invoice_date: String,
    pub total: String,
    pub status: IntakeStatus,
    pub note: String,
}

impl Classification {
    /// Forces review status. An existing note is kept since it already
    /// explains the review.
    pub fn downgrade(&mut self, note: impl Into<String>) {
        self.status = IntakeStatus::NeedsReview;
        if self.note.is_empty() {
            self.note = note.into();
        }
    }
}

/// Classifies one document. Pure: the same inputs always give the same output.
///
/// `extraction_error` carries the message of a failed extraction; in that case
/// `extracted` is expected to be empty.
pub fn classify(
    extracted: &ExtractedFields,
    fallback: &FilenameGuess,
    extraction_error: Option<&str>,
) -> Classification {
    let vendor = effective_vendor(&extracted.vendor, &fallback.vendor);
    let invoice_date =
        normalize_date(&extracted.invoice_date).unwrap_or_else(|| fallback.date.clone());
    let invoice_no = extracted.invoice_no.clone();
    let total = extracted.total.clone();

    let (status, note) = match extraction_error {
        Some(message) => (
            IntakeStatus::NeedsReview,
            format!("Parse error: {}", message),
        ),
        None => {
            let missing: Vec<&str> = [
                ("invoiceDate", &invoice_date),
                ("total", &total),
                ("invoiceNo", &invoice_no),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect();

            if missing.len() >= MISSING_FIELD_THRESHOLD {
                (
                    IntakeStatus::NeedsReview,
                    format!("Missing: {}", missing.join(", ")),
                )
            } else {
                (IntakeStatus::Success, String::new())
            }
        }
    };

    Classification {
        vendor,
        invoice_no,
        invoice_date,
        total,
        status,
        note,
    }
}

/// The extracted vendor when it is short enough and still names something
/// after sanitizing, else the filename guess.
fn effective_vendor(extracted: &str, fallback: &str) -> String {
    let extracted = extracted.trim();
    if extracted.chars().count() <= MAX_VENDOR_CHARS {
        if let Some(name) = sanitize::usable_name(extracted) {
            return name;
        }
    }
    sanitize::safe_name_or(fallback, UNKNOWN_VENDOR)
}

/// Normalizes a `D/M/Y`-family date (separators `/`, `.`, `-`) to `YYYY-MM-DD`.
///
/// Month-first is tried before day-first; two-digit years are 20YY. Returns
/// `None` for empty input or when neither reading is a calendar date.
pub fn normalize_date(raw: &str) -> Option<String> {
    let parts: Vec<&str> = raw.trim().split(&['/', '.', '-'][..]).collect();
    let [first, second, year] = parts.as_slice() else {
        return None;
    };

    let first: u32 = first.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    let year: i32 = match year.len() {
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };

    NaiveDate::from_ymd_opt(year, first, second)
        .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
        .map(|date| date.format("%Y-%m-%d").to_string())
}
