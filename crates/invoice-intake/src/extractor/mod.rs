pub mod patterns;
pub mod pdf;

use std::sync::Arc;

use crate::error::ExtractError;

pub use patterns::{collapse_whitespace, extract_fields};
pub use pdf::LopdfBackend;

/// Invoice fields pulled from document text. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub invoice_no: String,
    /// Date as matched in the text, e.g. `02/13/2026`; not normalized.
    pub invoice_date: String,
    pub total: String,
    pub vendor: String,
}

/// Converts raw document bytes to plain text.
///
/// Implementations fail only when the input cannot be read as a document;
/// a document without recognizable fields still yields `Ok`.
pub trait TextBackend: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Field Extractor: text backend followed by label-anchored pattern matching.
#[derive(Clone)]
pub struct FieldExtractor {
    backend: Arc<dyn TextBackend>,
}

impl FieldExtractor {
    pub fn new(backend: Arc<dyn TextBackend>) -> Self {
        Self { backend }
    }

    /// Extractor backed by [`LopdfBackend`].
    pub fn pdf() -> Self {
        Self::new(Arc::new(LopdfBackend::new()))
    }

    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedFields, ExtractError> {
        let text = self.backend.extract_text(bytes)?;
        Ok(extract_fields(&text))
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::pdf()
    }
}
