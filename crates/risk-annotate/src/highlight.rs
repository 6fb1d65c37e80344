//! Per-character style layer for the highlighted review text
//!
//! Every character gets at most one primary style. Spans are laid down in
//! precedence order and the first one to claim a character keeps it:
//! higher severity first, then semantic before rule, then the longer span,
//! then the earlier one. Reviewer query hits come last. Characters covered
//! by any semantic match additionally carry an underline flag.

use crate::locator::MatchLocator;
use serde::{Deserialize, Serialize};
use shared_types::{MatchStyle, ResolvedMatch, Severity, StyleKind};
use std::cmp::Reverse;

/// A maximal run of characters sharing the same annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub style: Option<MatchStyle>,
    pub semantic_underline: bool,
}

struct Span {
    start: usize,
    end: usize,
    style: MatchStyle,
}

impl Span {
    fn precedence(&self) -> (bool, Reverse<u8>, u8, Reverse<usize>, usize) {
        let kind = match self.style.kind {
            StyleKind::Semantic => 0,
            StyleKind::Rule => 1,
            StyleKind::Query => 2,
        };
        (
            self.style.kind == StyleKind::Query,
            Reverse(self.style.severity.rank()),
            kind,
            Reverse(self.end - self.start),
            self.start,
        )
    }
}

/// Split `text` into contiguous segments covering it exactly
pub fn highlight(
    text: &str,
    matches: &[ResolvedMatch],
    query: Option<&str>,
) -> Vec<HighlightSegment> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    if n == 0 {
        return Vec::new();
    }

    let mut spans: Vec<Span> = matches
        .iter()
        .map(|m| Span {
            start: m.start.min(n),
            end: m.end.min(n),
            style: m.style(),
        })
        .filter(|s| s.end > s.start)
        .collect();

    if let Some(query) = query.filter(|q| !q.trim().is_empty()) {
        let query_style = MatchStyle {
            kind: StyleKind::Query,
            severity: Severity::None,
        };
        spans.extend(
            MatchLocator::new(text)
                .find(query)
                .into_iter()
                .map(|(start, end)| Span {
                    start,
                    end,
                    style: query_style,
                }),
        );
    }

    spans.sort_by_key(|s| s.precedence());

    let mut layer: Vec<Option<MatchStyle>> = vec![None; n];
    let mut underline = vec![false; n];
    for span in &spans {
        let is_semantic = span.style.kind == StyleKind::Semantic;
        for i in span.start..span.end {
            if layer[i].is_none() {
                layer[i] = Some(span.style);
            }
            if is_semantic {
                underline[i] = true;
            }
        }
    }

    let mut segments = Vec::new();
    let mut seg_start = 0;
    for i in 1..=n {
        if i == n || layer[i] != layer[seg_start] || underline[i] != underline[seg_start] {
            segments.push(HighlightSegment {
                start: seg_start,
                end: i,
                text: chars[seg_start..i].iter().collect(),
                style: layer[seg_start],
                semantic_underline: underline[seg_start],
            });
            seg_start = i;
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_types::MatchSource;

    fn resolved(
        start: usize,
        end: usize,
        source: MatchSource,
        severity: Severity,
    ) -> ResolvedMatch {
        ResolvedMatch {
            token: String::new(),
            source,
            severity: Some(severity),
            start,
            end,
            page: 1,
            line: 1,
            reason: None,
        }
    }

    fn style(kind: StyleKind, severity: Severity) -> Option<MatchStyle> {
        Some(MatchStyle { kind, severity })
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        let segments = highlight("sin riesgos", &[], None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "sin riesgos");
        assert_eq!(segments[0].style, None);
        assert!(highlight("", &[], None).is_empty());
    }

    #[test]
    fn test_segments_cover_text_in_order() {
        let text = "pago de multa diaria";
        let matches = [resolved(8, 13, MatchSource::Rule, Severity::High)];
        let segments = highlight(text, &matches, None);

        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["pago de ", "multa", " diaria"]);
        assert_eq!(segments[1].style, style(StyleKind::Rule, Severity::High));
        assert_eq!((segments[1].start, segments[1].end), (8, 13));
    }

    #[test]
    fn test_higher_severity_wins_overlap() {
        // "clausula penal": LOW rule over the whole phrase, HIGH semantic over "penal"
        let matches = [
            resolved(0, 14, MatchSource::Rule, Severity::Low),
            resolved(9, 14, MatchSource::Semantic, Severity::High),
        ];
        let segments = highlight("clausula penal", &matches, None);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].style, style(StyleKind::Rule, Severity::Low));
        assert!(!segments[0].semantic_underline);
        assert_eq!(segments[1].style, style(StyleKind::Semantic, Severity::High));
        assert!(segments[1].semantic_underline);
    }

    #[test]
    fn test_semantic_wins_severity_tie() {
        let matches = [
            resolved(0, 5, MatchSource::Rule, Severity::Medium),
            resolved(0, 5, MatchSource::Semantic, Severity::Medium),
        ];
        let segments = highlight("multa", &matches, None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].style, style(StyleKind::Semantic, Severity::Medium));
        assert!(segments[0].semantic_underline);
    }

    #[test]
    fn test_rule_outranks_semantic_only_by_severity() {
        // HIGH rule over "multa", MEDIUM semantic over the whole phrase
        let matches = [
            resolved(0, 11, MatchSource::Semantic, Severity::Medium),
            resolved(0, 5, MatchSource::Rule, Severity::High),
        ];
        let segments = highlight("multa doble", &matches, None);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].style, style(StyleKind::Rule, Severity::High));
        assert!(segments[0].semantic_underline);
        assert_eq!(segments[1].style, style(StyleKind::Semantic, Severity::Medium));
    }

    #[test]
    fn test_longer_span_wins_full_tie() {
        let matches = [
            resolved(0, 5, MatchSource::Rule, Severity::Low),
            resolved(0, 11, MatchSource::Rule, Severity::Low),
        ];
        let segments = highlight("multa doble", &matches, None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, 11);
    }

    #[test]
    fn test_query_has_lowest_priority() {
        let text = "plazo y plazo";
        let matches = [resolved(0, 5, MatchSource::Rule, Severity::None)];
        let segments = highlight(text, &matches, Some("PLAZO"));
        let styles: Vec<Option<MatchStyle>> = segments.iter().map(|s| s.style).collect();
        assert_eq!(
            styles,
            vec![
                style(StyleKind::Rule, Severity::None),
                None,
                style(StyleKind::Query, Severity::None),
            ]
        );
    }

    #[test]
    fn test_out_of_range_spans_are_clipped() {
        let matches = [
            resolved(3, 99, MatchSource::Rule, Severity::Low),
            resolved(7, 7, MatchSource::Rule, Severity::High),
        ];
        let segments = highlight("ley 123", &matches, None);
        assert_eq!(segments.last().map(|s| s.end), Some(7));
        assert_eq!(segments.len(), 2);
    }
}
