//! DOCX text extraction
//!
//! A DOCX file is a zip container; the body lives in `word/document.xml`.
//! Paragraph and table-row ends become line feeds, every other tag is dropped.

use crate::encoding::decode_text;
use crate::error::ExtractionError;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub const DOCUMENT_XML: &str = "word/document.xml";

lazy_static! {
    /// End of paragraph or table row
    static ref BLOCK_END: Regex = Regex::new(r"</w:(?:p|tr)>").unwrap();

    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();

    static ref ENTITY: Regex =
        Regex::new(r"&(?:#x([0-9a-fA-F]+)|#([0-9]+)|(amp|lt|gt|quot|apos));").unwrap();
}

/// Extract plain text from DOCX bytes
pub fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractionError::Archive(e.to_string()))?;

    let mut xml = Vec::new();
    archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| ExtractionError::MissingEntry(DOCUMENT_XML.to_string()))?
        .read_to_end(&mut xml)
        .map_err(|e| ExtractionError::Archive(e.to_string()))?;

    Ok(xml_to_text(&decode_text(&xml)))
}

/// Strip WordprocessingML markup down to text
pub fn xml_to_text(xml: &str) -> String {
    let with_breaks = BLOCK_END.replace_all(xml, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped)
}

fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &Captures| {
            let code = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok()
            } else {
                None
            };

            if let Some(code) = code {
                return char::from_u32(code)
                    .map(String::from)
                    .unwrap_or_else(|| '\u{FFFD}'.to_string());
            }

            match caps.get(3).map(|m| m.as_str()) {
                Some("amp") => "&",
                Some("lt") => "<",
                Some("gt") => ">",
                Some("quot") => "\"",
                Some("apos") => "'",
                _ => "",
            }
            .to_string()
        })
        .into_owned()
}


#[cfg(test)]
mod tests {
    use super::test_docx::{create_archive, create_test_docx};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraphs_become_lines() {
        let docx = create_test_docx(&["PRIMERA.- Objeto", "SEGUNDA.- Plazo de 30 días"]);
        let text = extract_docx(&docx).unwrap();
        assert_eq!(text, "PRIMERA.- Objeto\nSEGUNDA.- Plazo de 30 días\n");
    }

    #[test]
    fn test_table_rows_break_lines() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc></w:tr>\
                   <w:tr><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(xml_to_text(xml), "A\n\nB\n\n");
    }

    #[test]
    fn test_paragraph_properties_are_not_breaks() {
        let xml = "<w:p><w:pPr><w:jc w:val=\"both\"/></w:pPr><w:r><w:t>Texto</w:t></w:r></w:p>";
        assert_eq!(xml_to_text(xml), "Texto\n");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(
            xml_to_text("<w:t>ADSIB &amp; UMSA &lt;convenio&gt; &#241;and&#xFA;</w:t>"),
            "ADSIB & UMSA <convenio> ñandú"
        );
    }

    #[test]
    fn test_missing_document_entry() {
        let archive = create_archive(&[("word/styles.xml", b"<w:styles/>")]);
        assert_eq!(
            extract_docx(&archive),
            Err(ExtractionError::MissingEntry(DOCUMENT_XML.to_string()))
        );
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            extract_docx(b"%PDF-1.4"),
            Err(ExtractionError::Archive(_))
        ));
    }
}
