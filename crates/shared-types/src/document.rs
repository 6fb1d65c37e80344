//! Stored documents and the versions that own them

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declared format of a stored document, taken from its file extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// Any other extension, kept lowercased for diagnostics
    Other(String),
}

impl DocumentFormat {
    /// Parse a declared extension ("PDF", ".docx", "txt"...)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            _ => DocumentFormat::Other(ext),
        }
    }

    /// Format of a storage path, by its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Other(ext) => ext,
        }
    }
}

/// An uploaded document: raw bytes plus its declared format.
///
/// Documents are never mutated once stored; replacing a file produces a new
/// `Document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
    /// Storage path the bytes were read from, if any
    pub path: Option<String>,
}

impl Document {
    pub fn new(format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            format,
            bytes,
            path: None,
        }
    }

    /// Build a document whose format is inferred from the storage path
    pub fn from_stored(path: &str, bytes: Vec<u8>) -> Self {
        Self {
            format: DocumentFormat::from_path(path),
            bytes,
            path: Some(path.to_string()),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// One uploaded revision of a convenio's document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentVersion {
    pub id: u64,
    pub number: u32,
    pub document: Document,
}

impl DocumentVersion {
    pub fn new(id: u64, number: u32, document: Document) -> Self {
        Self {
            id,
            number,
            document,
        }
    }
}
