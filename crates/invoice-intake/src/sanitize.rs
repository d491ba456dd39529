//! Helpers for turning untrusted strings into safe path segments and log fields.

use std::path::Path;

/// Characters that are unsafe in a path segment on at least one platform.
const RESERVED: [char; 10] = ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'];

/// Makes `input` safe to use as a single filesystem path segment.
///
/// Reserved characters and control characters become `-`, whitespace runs
/// collapse to a single space and the result is trimmed. Applying it twice
/// gives the same result as applying it once.
pub fn safe_name(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || (c.is_control() && !c.is_whitespace()) {
                '-'
            } else {
                c
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`safe_name`], or `None` when nothing usable remains.
///
/// A bare `.` or `..` would still resolve to a parent directory, so those are
/// treated as empty as well.
pub fn usable_name(input: &str) -> Option<String> {
    let name = safe_name(input);
    (!name.is_empty() && !name.chars().all(|c| c == '.')).then_some(name)
}

/// Like [`safe_name`], substituting `placeholder` when nothing usable remains.
pub fn safe_name_or(input: &str, placeholder: &str) -> String {
    usable_name(input).unwrap_or_else(|| placeholder.to_string())
}

/// Returns only the filename component of a path (no directory).
///
/// Used for span fields so logs carry the file name without the full path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
