//! Text extraction and fingerprinting for stored convenio documents
//!
//! `extract` never fails outright: a document without obtainable text comes
//! back as [`Extraction::Unsupported`] carrying the reason, and callers fall
//! back to comparing fingerprints.

pub mod docx;
pub mod encoding;
pub mod error;
pub mod fingerprint;
pub mod pdf;
pub mod quality;

pub use error::ExtractionError;
pub use fingerprint::{fingerprint, fingerprint_reader, Fingerprint};
pub use pdf::{PdfConfig, PdfExtractor, PdfStrategy};

use shared_types::{Document, DocumentFormat};
use tracing::{debug, warn};

/// Outcome of a text extraction attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Unsupported(ExtractionError),
}

impl Extraction {
    pub fn is_text(&self) -> bool {
        matches!(self, Extraction::Text(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Extraction::Text(text) => Some(text),
            Extraction::Unsupported(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Extraction::Text(text) => Some(text),
            Extraction::Unsupported(_) => None,
        }
    }
}

impl From<Result<String, ExtractionError>> for Extraction {
    fn from(result: Result<String, ExtractionError>) -> Self {
        match result {
            Ok(text) => Extraction::Text(text),
            Err(e) => Extraction::Unsupported(e),
        }
    }
}

/// Format-dispatching extractor
#[derive(Default)]
pub struct TextExtractor {
    pdf: PdfExtractor,
}

impl TextExtractor {
    pub fn new(pdf_config: PdfConfig) -> Self {
        Self {
            pdf: PdfExtractor::new(pdf_config),
        }
    }

    pub fn extract(&self, document: &Document) -> Extraction {
        let result = match &document.format {
            DocumentFormat::Pdf => self.pdf.extract(&document.bytes),
            DocumentFormat::Docx => docx::extract_docx(&document.bytes),
            DocumentFormat::Other(ext) => Err(ExtractionError::UnsupportedFormat(ext.clone())),
        };

        match &result {
            Ok(text) => debug!(
                format = document.format.extension(),
                chars = text.chars().count(),
                "text extracted"
            ),
            Err(e) => warn!(
                format = document.format.extension(),
                path = document.path.as_deref().unwrap_or("-"),
                error = %e,
                "text not available"
            ),
        }

        result.into()
    }
}

/// Extract with the default backend chain
pub fn extract(document: &Document) -> Extraction {
    TextExtractor::default().extract(document)
}
