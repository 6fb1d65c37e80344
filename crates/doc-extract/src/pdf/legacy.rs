//! Legacy backend using pdf-extract, one call per document, pages kept apart

use super::PdfBackend;
use crate::error::ExtractionError;

pub struct LegacyExtractor;

impl LegacyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LegacyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for LegacyExtractor {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data).map_err(|e| {
            let message = e.to_string();
            if message.contains("Identity-H") || message.contains("Unimplemented") {
                ExtractionError::EncodingFailure(message)
            } else {
                ExtractionError::ParseError(message)
            }
        })?;

        Ok(pages
            .iter()
            .map(|page| page.trim_matches('\n'))
            .collect::<Vec<_>>()
            .join("\x0C"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_extractor_name() {
        assert_eq!(LegacyExtractor::new().name(), "legacy");
    }

    #[test]
    fn test_can_handle_pdf() {
        assert!(LegacyExtractor::new().can_handle(b"%PDF-1.4 test"));
    }

    #[test]
    fn test_cannot_handle_non_pdf() {
        assert!(!LegacyExtractor::new().can_handle(b"Not a PDF file"));
    }
}
