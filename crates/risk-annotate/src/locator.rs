//! Pin risk matches to offsets and (page, line) coordinates
//!
//! Matches carrying a usable span are clamped to the text. Bare tokens are
//! searched for: the canonical token becomes an escaped pattern whose word
//! gaps match any whitespace run, and every non-overlapping hit in the
//! folded text yields one resolved match.

use crate::canonical::{canonical_token, FoldedText};
use crate::line_index::LineIndex;
use regex::Regex;
use shared_types::{ResolvedMatch, RiskMatch};
use tracing::{debug, warn};

pub struct MatchLocator {
    index: LineIndex,
    folded: FoldedText,
}

impl MatchLocator {
    pub fn new(text: &str) -> Self {
        Self {
            index: LineIndex::build(text),
            folded: FoldedText::new(text),
        }
    }

    pub fn index(&self) -> &LineIndex {
        &self.index
    }

    /// Resolve one match; a bare token may resolve to zero or many spans
    pub fn resolve(&self, m: &RiskMatch) -> Vec<ResolvedMatch> {
        if let Some((start, end)) = m.exact_span() {
            let len = self.index.len() as i64;
            let start = start.clamp(0, len) as usize;
            let end = end.clamp(0, len) as usize;
            return vec![self.pin(m, start, end)];
        }

        if m.start.is_some() || m.end.is_some() {
            debug!(
                token = %m.token,
                start = ?m.start,
                end = ?m.end,
                "malformed span, searching for token instead"
            );
        }

        self.find(&m.token)
            .into_iter()
            .map(|(start, end)| self.pin(m, start, end))
            .collect()
    }

    /// Character spans of every non-overlapping occurrence of a token
    pub fn find(&self, token: &str) -> Vec<(usize, usize)> {
        let canonical = canonical_token(token);
        if canonical.is_empty() {
            return Vec::new();
        }

        let pattern = canonical
            .split(' ')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(token = %token, error = %e, "token pattern rejected");
                return Vec::new();
            }
        };

        re.find_iter(self.folded.as_str())
            .filter(|hit| !hit.is_empty())
            .map(|hit| self.folded.original_span(hit.range()))
            .collect()
    }

    fn pin(&self, m: &RiskMatch, start: usize, end: usize) -> ResolvedMatch {
        let record = self.index.locate(start);
        ResolvedMatch {
            token: m.token.clone(),
            source: m.source,
            severity: m.severity,
            start,
            end,
            page: record.page,
            line: record.line,
            reason: m.reason.clone(),
        }
    }
}

/// Resolve every match against `text`, in input order
pub fn locate(text: &str, matches: &[RiskMatch]) -> Vec<ResolvedMatch> {
    if matches.is_empty() {
        return Vec::new();
    }
    let locator = MatchLocator::new(text);
    matches.iter().flat_map(|m| locator.resolve(m)).collect()
}
