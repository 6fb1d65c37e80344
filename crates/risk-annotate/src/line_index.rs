//! (page, line) coordinates for character offsets
//!
//! Offsets are counted in characters, the unit the risk scorer reports.
//! A form feed closes a page: the page number advances and line numbering
//! restarts at 1. A line feed closes a line.

use serde::{Deserialize, Serialize};

pub const FORM_FEED: char = '\x0C';

/// One line of text, spanning `[start, end)` including its terminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub page: u32,
    pub line: u32,
    pub start: usize,
    pub end: usize,
    /// Line content without the terminator
    pub text: String,
}

impl LineRecord {
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Ordered line records covering every character of a text exactly once.
///
/// The last record always ends at the text length; after a trailing
/// terminator (or for empty text) it is an empty record there, so
/// end-of-text offsets still resolve.
#[derive(Debug, Clone)]
pub struct LineIndex {
    records: Vec<LineRecord>,
    len: usize,
}

impl LineIndex {
    pub fn build(text: &str) -> Self {
        let mut records = Vec::new();
        let (mut page, mut line, mut start) = (1u32, 1u32, 0usize);
        let mut current = String::new();
        let mut len = 0;

        for (i, c) in text.chars().enumerate() {
            len = i + 1;
            if c != '\n' && c != FORM_FEED {
                current.push(c);
                continue;
            }

            if c == '\n' && current.ends_with('\r') {
                current.pop();
            }
            records.push(LineRecord {
                page,
                line,
                start,
                end: i + 1,
                text: std::mem::take(&mut current),
            });
            start = i + 1;
            if c == FORM_FEED {
                page += 1;
                line = 1;
            } else {
                line += 1;
            }
        }

        records.push(LineRecord {
            page,
            line,
            start,
            end: len,
            text: current,
        });

        Self { records, len }
    }

    /// Record containing `offset`, or the last record starting at or before it
    pub fn locate(&self, offset: usize) -> &LineRecord {
        let idx = self.records.partition_point(|r| r.start <= offset);
        &self.records[idx.saturating_sub(1)]
    }

    pub fn records(&self) -> &[LineRecord] {
        &self.records
    }

    /// Length of the indexed text in characters
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn page_count(&self) -> u32 {
        self.records.last().map(|r| r.page).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn coords(index: &LineIndex) -> Vec<(u32, u32, &str)> {
        index
            .records()
            .iter()
            .map(|r| (r.page, r.line, r.text.as_str()))
            .collect()
    }

    #[test]
    fn test_form_feed_starts_new_page() {
        let index = LineIndex::build("Pág. 1\nTexto A\x0CPág. 2\nTexto B");
        assert_eq!(
            coords(&index),
            vec![
                (1, 1, "Pág. 1"),
                (1, 2, "Texto A"),
                (2, 1, "Pág. 2"),
                (2, 2, "Texto B"),
            ]
        );
        assert_eq!(index.page_count(), 2);
    }

    #[test]
    fn test_offsets_are_characters() {
        let index = LineIndex::build("días\nplazo");
        let second = &index.records()[1];
        assert_eq!((second.start, second.end), (5, 10));
        assert_eq!(index.locate(5).line, 2);
        assert_eq!(index.locate(4).line, 1);
    }

    #[test]
    fn test_trailing_terminator_leaves_empty_record() {
        let index = LineIndex::build("uno\n");
        assert_eq!(coords(&index), vec![(1, 1, "uno"), (1, 2, "")]);
        assert_eq!(index.locate(4).line, 2);
    }

    #[test]
    fn test_empty_text() {
        let index = LineIndex::build("");
        assert!(index.is_empty());
        assert_eq!(index.records().len(), 1);
        assert_eq!(index.locate(0).page, 1);
    }

    #[test]
    fn test_offset_past_end_clamps_to_last_record() {
        let index = LineIndex::build("a\nb");
        assert_eq!(index.locate(99).line, 2);
    }

    #[test]
    fn test_crlf_excluded_from_text() {
        let index = LineIndex::build("uno\r\ndos");
        assert_eq!(index.records()[0].text, "uno");
        assert_eq!(index.records()[0].end, 5);
    }

    proptest! {
        /// Property: every character offset lies in exactly one record
        #[test]
        fn records_cover_every_offset(text in "[a-zé \n\x0C]{0,80}") {
            let index = LineIndex::build(&text);
            let len = text.chars().count();
            let records = index.records();

            prop_assert_eq!(records.first().map(|r| r.start), Some(0));
            prop_assert_eq!(records.last().map(|r| r.end), Some(len));
            for i in 0..len {
                let hits = records.iter().filter(|r| r.contains(i)).count();
                prop_assert_eq!(hits, 1);
                prop_assert!(index.locate(i).contains(i));
            }
        }
    }
}
