use crate::error::ExtractError;
use crate::extractor::TextBackend;

/// Text backend built on lopdf's page text extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl LopdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for LopdfBackend {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let _span = tracing::debug_span!("extractor.pdf", bytes = bytes.len()).entered();

        let doc =
            lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::PdfLoad(e.to_string()))?;

        let pages = doc.get_pages();
        if pages.is_empty() {
            return Err(ExtractError::TextExtraction(
                "document has no pages".to_string(),
            ));
        }

        let mut text = String::new();
        let mut failed_pages = 0usize;

        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    failed_pages += 1;
                    tracing::debug!("Page {} text extraction failed: {}", page_num, e);
                }
            }
        }

        if failed_pages == pages.len() {
            return Err(ExtractError::TextExtraction(format!(
                "no readable text on any of {} page(s)",
                pages.len()
            )));
        }

        Ok(text)
    }
}
