//! Native backend reading text operators straight from lopdf content streams
//!
//! Decodes string operands as UTF-8, then UTF-16BE, then Latin-1. Line breaks
//! come from `T*`, `'`, `"` and vertical `Td`/`TD` moves.

use super::PdfBackend;
use crate::encoding::{decode_utf16_with_bom, latin1};
use crate::error::ExtractionError;
use lopdf::{Document, Object};
use tracing::debug;

pub struct NativeExtractor;

impl NativeExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract from an already parsed document
    pub fn extract_from_document(&self, doc: &Document) -> String {
        let mut pages = Vec::new();

        for (page_num, page_id) in doc.get_pages() {
            let mut page_text = String::new();

            let content = match doc.get_page_content(page_id) {
                Ok(content) => content,
                Err(e) => {
                    debug!(page = page_num, error = %e, "page has no readable content");
                    pages.push(page_text);
                    continue;
                }
            };

            if let Ok(decoded) = lopdf::content::Content::decode(&content) {
                for op in decoded.operations {
                    match op.operator.as_str() {
                        "Tj" | "TJ" => push_operands(&mut page_text, &op.operands),
                        "'" | "\"" => {
                            new_line(&mut page_text);
                            push_operands(&mut page_text, &op.operands);
                        }
                        "T*" => new_line(&mut page_text),
                        "Td" | "TD" => {
                            let dy = op
                                .operands
                                .get(1)
                                .and_then(|o| o.as_float().ok())
                                .unwrap_or(0.0);
                            if dy != 0.0 {
                                new_line(&mut page_text);
                            }
                        }
                        _ => {}
                    }
                }
            }

            pages.push(page_text.trim_end_matches('\n').to_string());
        }

        pages.join("\x0C")
    }
}

impl Default for NativeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend for NativeExtractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        let doc =
            Document::load_mem(data).map_err(|e| ExtractionError::ParseError(e.to_string()))?;
        Ok(self.extract_from_document(&doc))
    }
}

fn new_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

fn push_operands(text: &mut String, operands: &[Object]) {
    for operand in operands {
        if let Some(s) = operand_text(operand) {
            text.push_str(&s);
        }
    }
}

fn operand_text(operand: &Object) -> Option<String> {
    match operand {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Array(items) => {
            let mut text = String::new();
            for item in items {
                match item {
                    Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
                    // Large negative kerning is a word gap
                    Object::Integer(n) if *n < -100 => text.push(' '),
                    Object::Real(n) if *n < -100.0 => text.push(' '),
                    _ => {}
                }
            }
            Some(text)
        }
        _ => None,
    }
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    decode_utf16_with_bom(bytes).unwrap_or_else(|| latin1(bytes))
}
