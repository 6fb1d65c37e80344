//! PDF text extraction with backend fallback
//!
//! Two backends are chained:
//! - Legacy: pdf-extract (best layout for ordinary PDFs)
//! - Native: lopdf content-stream text operators (survives fonts pdf-extract
//!   chokes on)
//!
//! Pages are separated by a form feed (`\x0C`) in the returned text.

pub mod legacy;
pub mod native;

use crate::error::ExtractionError;
use crate::quality::check_text_quality;
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

pub use legacy::LegacyExtractor;
pub use native::NativeExtractor;

/// Trait for PDF extraction backends
pub trait PdfBackend {
    fn name(&self) -> &'static str;

    /// Check if this backend can likely handle the PDF
    fn can_handle(&self, data: &[u8]) -> bool {
        data.len() > 4 && &data[0..4] == b"%PDF"
    }

    /// Extract the whole document, pages joined by form feed
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError>;
}

/// Which backends to run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfStrategy {
    /// Legacy first, native on failure
    #[default]
    Auto,
    Legacy,
    Native,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub strategy: PdfStrategy,
    /// Reject output that looks like a broken font encoding
    pub validate_output: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            strategy: PdfStrategy::Auto,
            validate_output: true,
        }
    }
}

pub struct PdfExtractor {
    config: PdfConfig,
    legacy: LegacyExtractor,
    native: NativeExtractor,
}

impl PdfExtractor {
    pub fn new(config: PdfConfig) -> Self {
        Self {
            config,
            legacy: LegacyExtractor::new(),
            native: NativeExtractor::new(),
        }
    }

    fn backends(&self) -> Vec<&dyn PdfBackend> {
        match self.config.strategy {
            PdfStrategy::Auto => vec![&self.legacy, &self.native],
            PdfStrategy::Legacy => vec![&self.legacy],
            PdfStrategy::Native => vec![&self.native],
        }
    }

    /// Run the backend chain; the first acceptable output wins
    pub fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let mut last_error = ExtractionError::ParseError("Not a PDF file".to_string());

        for backend in self.backends() {
            if !backend.can_handle(data) {
                debug!(backend = backend.name(), "backend cannot handle input");
                continue;
            }

            match run_contained(backend, data) {
                Ok(text) => {
                    if text.trim().is_empty() {
                        debug!(backend = backend.name(), "backend produced no text");
                        last_error = ExtractionError::EmptyText;
                        continue;
                    }
                    if self.config.validate_output {
                        if let Err(details) = check_text_quality(&text) {
                            warn!(backend = backend.name(), %details, "rejecting extracted text");
                            last_error = ExtractionError::GarbageOutput(details);
                            continue;
                        }
                    }
                    debug!(backend = backend.name(), chars = text.len(), "PDF text extracted");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "PDF backend failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(PdfConfig::default())
    }
}

/// Parsers occasionally panic on malformed input; report that as a parse error
fn run_contained(backend: &dyn PdfBackend, data: &[u8]) -> Result<String, ExtractionError> {
    match catch_unwind(AssertUnwindSafe(|| backend.extract(data))) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(ExtractionError::ParseError(format!(
                "{} backend panicked: {}",
                backend.name(),
                msg
            )))
        }
    }
}
