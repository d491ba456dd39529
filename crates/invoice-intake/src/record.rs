use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Column order of the structured record log.
pub const RECORD_HEADER: [&str; 9] = [
    "timestamp",
    "originalFile",
    "newFile",
    "vendor",
    "invoiceNo",
    "invoiceDate",
    "total",
    "status",
    "note",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntakeStatus {
    Success,
    NeedsReview,
}

impl IntakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntakeStatus::Success => "success",
            IntakeStatus::NeedsReview => "needs-review",
        }
    }
}

impl fmt::Display for IntakeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one accepted input file.
///
/// Field order matches [`RECORD_HEADER`]; the CSV sink relies on serde
/// field order to write its header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub timestamp: String,
    pub original_file: String,
    pub new_file: String,
    pub vendor: String,
    pub invoice_no: String,
    pub invoice_date: String,
    pub total: String,
    pub status: IntakeStatus,
    pub note: String,
}

/// RFC 3339 UTC with millisecond precision, e.g. `2026-02-13T09:30:00.123Z`.
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}
