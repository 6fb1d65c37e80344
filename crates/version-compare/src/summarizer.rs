//! Verdict for a pair of adjacent versions
//!
//! Both sides are always fingerprinted. When text is available on both
//! sides the verdict is the character similarity; otherwise it falls back
//! to comparing hashes. Summarizing never fails.

use crate::config::CompareConfig;
use crate::line_diff::LineDiffer;
use crate::similarity::text_similarity;
use chrono::{DateTime, Utc};
use doc_extract::{Fingerprint, TextExtractor};
use serde::{Deserialize, Serialize};
use shared_types::{Comparison, DiffDetails, DiffRow, DocumentVersion};
use tracing::{debug, info, warn};

/// A comparison plus the line rows it was computed from, when text was available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub comparison: Comparison,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<DiffRow>>,
}

pub struct ComparisonSummarizer {
    config: CompareConfig,
    extractor: TextExtractor,
}

impl ComparisonSummarizer {
    pub fn new(config: CompareConfig, extractor: TextExtractor) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare two versions, stamping the record with the current time
    pub fn summarize(&self, base: &DocumentVersion, compared: &DocumentVersion) -> Comparison {
        self.summarize_at(base, compared, Utc::now())
    }

    pub fn summarize_at(
        &self,
        base: &DocumentVersion,
        compared: &DocumentVersion,
        created_at: DateTime<Utc>,
    ) -> Comparison {
        self.compare(base, compared, created_at, false).comparison
    }

    /// Summarize and also return the line rows for the side-by-side view
    pub fn report(&self, base: &DocumentVersion, compared: &DocumentVersion) -> ComparisonReport {
        self.compare(base, compared, Utc::now(), true)
    }

    fn compare(
        &self,
        base: &DocumentVersion,
        compared: &DocumentVersion,
        created_at: DateTime<Utc>,
        with_rows: bool,
    ) -> ComparisonReport {
        let fp_base = Fingerprint::of_document(&base.document);
        let fp_compared = Fingerprint::of_document(&compared.document);
        let texts = self.texts(base, compared);

        let similarity = texts
            .as_ref()
            .map(|(a, b)| text_similarity(a, b));
        let summary_text = self.verdict(similarity, &fp_base, &fp_compared);

        info!(
            base = base.id,
            compared = compared.id,
            similarity = ?similarity,
            summary = %summary_text,
            "versions compared"
        );

        let rows = texts.filter(|_| with_rows).map(|(a, b)| {
            LineDiffer::new(self.config.diff)
                .with_timeout(self.config.diff_timeout())
                .diff(&a, &b)
        });

        ComparisonReport {
            comparison: Comparison {
                base_version_id: base.id,
                compared_version_id: compared.id,
                diff_details: DiffDetails {
                    hash_base: fp_base.hash,
                    hash_compared: fp_compared.hash,
                    size_base: fp_base.size,
                    size_compared: fp_compared.size,
                    text_similarity_percent: similarity,
                },
                summary_text,
                created_at,
            },
            rows,
        }
    }

    /// Text of both sides, or `None` when either is unavailable or too large
    fn texts(
        &self,
        base: &DocumentVersion,
        compared: &DocumentVersion,
    ) -> Option<(String, String)> {
        let a = self.extractor.extract(&base.document).into_text()?;
        let b = self.extractor.extract(&compared.document).into_text()?;

        if let Some(limit) = self.config.max_text_chars {
            let (len_a, len_b) = (a.chars().count(), b.chars().count());
            if len_a > limit || len_b > limit {
                warn!(len_a, len_b, limit, "text too large, comparing by hash");
                return None;
            }
        }

        debug!(base = base.id, compared = compared.id, "text available on both sides");
        Some((a, b))
    }

    fn verdict(
        &self,
        similarity: Option<f64>,
        base: &Fingerprint,
        compared: &Fingerprint,
    ) -> String {
        match similarity {
            Some(pct) if pct >= self.config.identical_threshold => {
                format!("match {}%. No significant changes.", pct)
            }
            Some(pct) => format!("match {}%. Changes detected.", pct),
            None if base.same_content(compared) => "Identical files (hash).".to_string(),
            None => "Changes detected (binary comparison).".to_string(),
        }
    }
}

impl Default for ComparisonSummarizer {
    fn default() -> Self {
        Self::new(CompareConfig::default(), TextExtractor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::{DiffOp, Document, DocumentFormat};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
            .collect();
        let xml = format!("<w:document><w:body>{}</w:body></w:document>", body);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn version(id: u64, number: u32, ext: &str, bytes: Vec<u8>) -> DocumentVersion {
        DocumentVersion::new(id, number, Document::new(DocumentFormat::from_extension(ext), bytes))
    }

    #[test]
    fn test_identical_unsupported_files_compare_by_hash() {
        let base = version(1, 1, "txt", b"same bytes".to_vec());
        let compared = version(2, 2, "txt", b"same bytes".to_vec());
        let comparison = ComparisonSummarizer::default().summarize(&base, &compared);

        assert_eq!(comparison.summary_text, "Identical files (hash).");
        assert_eq!(comparison.diff_details.text_similarity_percent, None);
        assert_eq!(comparison.diff_details.hash_base, comparison.diff_details.hash_compared);
        assert_eq!(comparison.base_version_id, 1);
        assert_eq!(comparison.compared_version_id, 2);
    }

    #[test]
    fn test_different_unsupported_files() {
        let base = version(1, 1, "odt", b"v1".to_vec());
        let compared = version(2, 2, "odt", b"v2!".to_vec());
        let comparison = ComparisonSummarizer::default().summarize(&base, &compared);

        assert_eq!(comparison.summary_text, "Changes detected (binary comparison).");
        assert_eq!(comparison.diff_details.size_base, 2);
        assert_eq!(comparison.diff_details.size_compared, 3);
    }

    #[test]
    fn test_same_text_docx() {
        let bytes = docx(&["PRIMERA.- Objeto", "SEGUNDA.- Plazo"]);
        let base = version(10, 1, "docx", bytes.clone());
        let compared = version(11, 2, "DOCX", bytes);
        let comparison = ComparisonSummarizer::default().summarize(&base, &compared);

        assert_eq!(comparison.diff_details.text_similarity_percent, Some(100.0));
        assert_eq!(comparison.summary_text, "match 100%. No significant changes.");
    }

    #[test]
    fn test_changed_text_docx() {
        let base = version(10, 1, "docx", docx(&["abcd"]));
        let compared = version(11, 2, "docx", docx(&["abcx"]));
        let comparison = ComparisonSummarizer::default().summarize(&base, &compared);

        // "abcd\n" vs "abcx\n": 4 of 5 characters kept on each side
        assert_eq!(comparison.diff_details.text_similarity_percent, Some(80.0));
        assert_eq!(comparison.summary_text, "match 80%. Changes detected.");
    }

    #[test]
    fn test_one_side_without_text_falls_back_to_hash() {
        let base = version(10, 1, "docx", docx(&["Objeto"]));
        let compared = version(11, 2, "pdf", b"%PDF-1.4 broken".to_vec());
        let comparison = ComparisonSummarizer::default().summarize(&base, &compared);

        assert_eq!(comparison.diff_details.text_similarity_percent, None);
        assert_eq!(comparison.summary_text, "Changes detected (binary comparison).");
    }

    /// Deterministic text over a four-letter alphabet
    fn scrambled(seed: u64, len: usize) -> String {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                (b'a' + (state >> 62) as u8) as char
            })
            .collect()
    }

    #[test]
    fn test_similarity_ignores_diff_deadline() {
        let (a, b) = (scrambled(7, 4000), scrambled(11, 4000));
        let base = version(10, 1, "docx", docx(&[a.as_str()]));
        let compared = version(11, 2, "docx", docx(&[b.as_str()]));

        let with_deadline = ComparisonSummarizer::new(
            CompareConfig {
                diff_timeout_ms: 1,
                ..Default::default()
            },
            TextExtractor::default(),
        );
        let created_at = Utc::now();
        let hurried = with_deadline.summarize_at(&base, &compared, created_at);
        let unbounded = ComparisonSummarizer::new(
            CompareConfig {
                diff_timeout_ms: 0,
                ..Default::default()
            },
            TextExtractor::default(),
        )
        .summarize_at(&base, &compared, created_at);

        let expected = text_similarity(&format!("{}\n", a), &format!("{}\n", b));
        assert!(expected > 40.0);
        assert_eq!(hurried.diff_details.text_similarity_percent, Some(expected));
        assert_eq!(hurried, unbounded);
    }

    #[test]
    fn test_size_ceiling_degrades_to_hash() {
        let summarizer = ComparisonSummarizer::new(
            CompareConfig {
                max_text_chars: Some(5),
                ..Default::default()
            },
            TextExtractor::default(),
        );
        let base = version(10, 1, "docx", docx(&["Clausula larga"]));
        let compared = version(11, 2, "docx", docx(&["Clausula larga"]));
        let comparison = summarizer.summarize(&base, &compared);

        assert_eq!(comparison.diff_details.text_similarity_percent, None);
        assert_eq!(comparison.summary_text, "Identical files (hash).");
    }

    #[test]
    fn test_custom_threshold() {
        let summarizer = ComparisonSummarizer::new(
            CompareConfig {
                identical_threshold: 75.0,
                ..Default::default()
            },
            TextExtractor::default(),
        );
        let base = version(10, 1, "docx", docx(&["abcd"]));
        let compared = version(11, 2, "docx", docx(&["abcx"]));
        assert_eq!(
            summarizer.summarize(&base, &compared).summary_text,
            "match 80%. No significant changes."
        );
    }

    #[test]
    fn test_report_carries_rows() {
        let base = version(10, 1, "docx", docx(&["Objeto", "Plazo 30 dias"]));
        let compared = version(11, 2, "docx", docx(&["Objeto", "Plazo 60 dias"]));
        let report = ComparisonSummarizer::default().report(&base, &compared);

        let rows = report.rows.unwrap();
        let ops: Vec<DiffOp> = rows.iter().map(|r| r.op).collect();
        assert_eq!(
            ops,
            vec![DiffOp::Equal, DiffOp::Deleted, DiffOp::Inserted, DiffOp::Equal]
        );
        assert_eq!(rows[1].text, "Plazo 30 dias");
    }

    #[test]
    fn test_report_without_text_has_no_rows() {
        let base = version(1, 1, "txt", b"a".to_vec());
        let compared = version(2, 2, "txt", b"b".to_vec());
        let report = ComparisonSummarizer::default().report(&base, &compared);
        assert_eq!(report.rows, None);
    }

    #[test]
    fn test_comparison_serializes() {
        let base = version(1, 1, "txt", b"a".to_vec());
        let created_at = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let comparison =
            ComparisonSummarizer::default().summarize_at(&base, &base, created_at);
        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["created_at"], "2024-03-01T12:00:00Z");
        assert_eq!(json["summary_text"], "Identical files (hash).");
    }
}
