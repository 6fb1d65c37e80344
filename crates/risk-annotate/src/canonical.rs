//! Accent- and case-insensitive token keys
//!
//! Folding lowercases, decomposes to NFD and drops combining marks, so
//! "Días" and "dias" compare equal. [`FoldedText`] keeps the way back from
//! folded byte offsets to character offsets of the original text.

use std::ops::Range;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Tokens longer than this lose a plural ending
const PLURAL_MIN_CHARS: usize = 4;

fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().nfd().filter(|d| !is_combining_mark(*d))
}

/// Lowercase and strip accents
pub fn fold(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Final letters of singulars that pluralize with "es" (papel, razon, mes...)
const ES_PLURAL_STEM_ENDINGS: &[char] = &['d', 'j', 'l', 'n', 'r', 's', 'x', 'y', 'z'];

/// Grouping key of a token: folded, whitespace collapsed, plural removed.
///
/// "es" is only dropped when what remains can end a singular, so "partes"
/// keys as "parte" while "penalidades" keys as "penalidad".
pub fn canonical_token(token: &str) -> String {
    let folded = fold(token);
    let mut canonical = folded.split_whitespace().collect::<Vec<_>>().join(" ");

    if canonical.chars().count() > PLURAL_MIN_CHARS {
        let es_stem = canonical
            .strip_suffix("es")
            .filter(|stem| stem.ends_with(ES_PLURAL_STEM_ENDINGS))
            .map(str::len);
        match es_stem {
            Some(len) => canonical.truncate(len),
            None if canonical.ends_with('s') => {
                canonical.pop();
            }
            None => {}
        }
    }
    canonical
}

/// A folded copy of a text with a map back to original character offsets
#[derive(Debug, Clone)]
pub struct FoldedText {
    folded: String,
    /// Original character index of every folded byte
    origin: Vec<usize>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());

        for (i, c) in text.chars().enumerate() {
            for d in fold_char(c) {
                folded.push(d);
                origin.extend(std::iter::repeat(i).take(d.len_utf8()));
            }
        }

        Self { folded, origin }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    /// Original character span of a non-empty folded byte range
    pub fn original_span(&self, range: Range<usize>) -> (usize, usize) {
        let start = self.origin[range.start];
        let end = self.origin[range.end - 1] + 1;
        (start, end)
    }
}
