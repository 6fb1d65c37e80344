use thiserror::Error;

/// Reasons a document yields no text.
///
/// Every variant is an expected outcome: callers treat them all as
/// "text not available" and fall back to byte-level comparison.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    #[error("Garbage output detected: {0}")]
    GarbageOutput(String),

    #[error("Document has no text layer")]
    EmptyText,

    #[error("Invalid DOCX archive: {0}")]
    Archive(String),

    #[error("DOCX entry not found: {0}")]
    MissingEntry(String),
}
