//! Pre-diff cleanup of extracted text and helpers over diff rows
//!
//! Extracted PDF text is noisy: image codes, page furniture, stray quotes
//! and HTML entities left over from older stored text. Cleaning both sides
//! the same way keeps that noise out of the comparison view.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{DiffOp, DiffRow};

lazy_static! {
    /// Applied in order; `&amp;` goes before `&lt;`/`&gt;` so doubly
    /// escaped text still comes out readable.
    static ref HTML_ENTITIES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)&quot;").unwrap(), "\""),
        (Regex::new(r"(?i)&apos;").unwrap(), "'"),
        (Regex::new(r"&#39;").unwrap(), "'"),
        (Regex::new(r"(?i)&amp;").unwrap(), "&"),
        (Regex::new(r"(?i)&lt;").unwrap(), "<"),
        (Regex::new(r"(?i)&gt;").unwrap(), ">"),
    ];

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Image or reference codes glued to the start of a line
    static ref NUMERIC_PREFIX: Regex = Regex::new(r"^[0-9\-.,/]{8,}\s*").unwrap();

    static ref QUOTES_ONLY: Regex = Regex::new(r#"^['"“”‘’«»`´]+$"#).unwrap();
}

/// Lines with fewer letters than this share are treated as codes or tables
const MIN_LETTER_RATIO: f64 = 0.25;

fn decode_html_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || "ÁÉÍÓÚÜÑáéíóúüñ".contains(c)
}

fn clean_line(line: &str) -> Option<String> {
    let collapsed = WHITESPACE.replace_all(line, " ");
    let collapsed = collapsed.trim();
    if collapsed.is_empty() {
        return None;
    }

    let line = NUMERIC_PREFIX.replace(collapsed, "").trim().to_string();
    if line.is_empty() {
        return None;
    }

    let no_spaces = WHITESPACE.replace_all(&line, "");
    if QUOTES_ONLY.is_match(&no_spaces) {
        return None;
    }

    let len = line.chars().count();
    let letters = line.chars().filter(|c| is_letter(*c)).count();
    if letters == 0 || (letters as f64) / (len as f64) < MIN_LETTER_RATIO {
        return None;
    }

    Some(line)
}

/// Clean extracted text line by line before diffing.
///
/// Decodes HTML entities, unifies CRLF, collapses whitespace, strips long
/// numeric prefixes and drops blank, quote-only and mostly non-letter lines.
pub fn normalize_for_diff(text: &str) -> String {
    decode_html_entities(text)
        .replace("\r\n", "\n")
        .split('\n')
        .filter_map(clean_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indices of rows containing `query`, ignoring case. An empty query finds nothing.
pub fn find_rows(rows: &[DiffRow], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.text.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Row counts per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffStats {
    pub equal: usize,
    pub deleted: usize,
    pub inserted: usize,
}

impl DiffStats {
    pub fn from_rows(rows: &[DiffRow]) -> Self {
        rows.iter().fold(Self::default(), |mut stats, row| {
            match row.op {
                DiffOp::Equal => stats.equal += 1,
                DiffOp::Deleted => stats.deleted += 1,
                DiffOp::Inserted => stats.inserted += 1,
            }
            stats
        })
    }

    pub fn has_changes(&self) -> bool {
        self.deleted > 0 || self.inserted > 0
    }
}
