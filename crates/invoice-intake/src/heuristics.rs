//! Fallback vendor and date guesses derived from the original filename.
//!
//! Files are commonly named `Vendor_YYYYMMDD_anything.pdf`; these guesses
//! fill in when the document text yields nothing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

static RE_FILENAME_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(20\d{2})(\d{2})(\d{2})").unwrap());

pub const UNKNOWN_VENDOR_GUESS: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameGuess {
    pub vendor: String,
    /// `YYYY-MM-DD`, or empty when the name carries no date.
    pub date: String,
}

impl FilenameGuess {
    pub fn from_filename(filename: &str) -> Self {
        Self {
            vendor: vendor_from_filename(filename),
            date: date_from_filename(filename),
        }
    }
}

fn stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// The part of the stem before the first `_`, or `"Unknown"`.
pub fn vendor_from_filename(filename: &str) -> String {
    let first = stem(filename).split('_').next().unwrap_or("").trim();
    if first.is_empty() {
        UNKNOWN_VENDOR_GUESS.to_string()
    } else {
        first.to_string()
    }
}

/// The first `20YYMMDD` run in the stem, reformatted as `YYYY-MM-DD`.
pub fn date_from_filename(filename: &str) -> String {
    RE_FILENAME_DATE
        .captures(stem(filename))
        .map(|caps| format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]))
        .unwrap_or_default()
}
