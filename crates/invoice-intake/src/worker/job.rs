use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// One detected file, stamped at detection time.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub source_path: PathBuf,
    pub detected_at: DateTime<Utc>,
}

impl Job {
    pub fn new(source_path: PathBuf) -> Self {
        Self::detected_at(source_path, Utc::now())
    }

    pub fn detected_at(source_path: PathBuf, detected_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_path,
            detected_at,
        }
    }

    /// Basename as detected.
    pub fn original_file(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn is_pdf(&self) -> bool {
        has_pdf_extension(&self.source_path)
    }
}

/// Case-insensitive `.pdf` extension check.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
