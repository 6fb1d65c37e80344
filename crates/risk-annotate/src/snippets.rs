//! Context snippets and token tables for the review panel

use crate::canonical::canonical_token;
use crate::line_index::FORM_FEED;
use serde::{Deserialize, Serialize};
use shared_types::{ResolvedMatch, Snippet, TokenAggregate};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Fallback reach of a snippet when no line break bounds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub before: usize,
    pub after: usize,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self {
            before: 160,
            after: 220,
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == FORM_FEED
}

/// Extract at most `max_count` snippets, one per (canonical token, page, line)
pub fn extract_snippets(text: &str, matches: &[ResolvedMatch], max_count: usize) -> Vec<Snippet> {
    extract_snippets_with(text, matches, max_count, ContextWindow::default())
}

pub fn extract_snippets_with(
    text: &str,
    matches: &[ResolvedMatch],
    max_count: usize,
    window: ContextWindow,
) -> Vec<Snippet> {
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut seen = HashSet::new();
    let mut snippets = Vec::new();

    for m in matches {
        if snippets.len() >= max_count {
            break;
        }

        let start = m.start.min(n);
        let end = m.end.clamp(start, n);

        let mut canonical = canonical_token(&m.token);
        if canonical.is_empty() {
            canonical = canonical_token(&chars[start..end].iter().collect::<String>());
        }

        let key = format!("{}|p{}|l{}", canonical, m.page, m.line);
        if !seen.insert(key) {
            debug!(token = %m.token, page = m.page, line = m.line, "duplicate snippet dropped");
            continue;
        }

        let left = chars[..start]
            .iter()
            .rposition(|c| is_line_break(*c))
            .map(|p| p + 1)
            .unwrap_or_else(|| start.saturating_sub(window.before));
        let right = chars[end..]
            .iter()
            .position(|c| is_line_break(*c))
            .map(|p| end + p)
            .unwrap_or_else(|| (end + window.after).min(n));

        let context: String = chars[left..right].iter().collect();
        snippets.push(Snippet {
            token: m.token.clone(),
            canonical,
            context: context.trim().to_string(),
            style: m.style(),
            start,
            end,
            page: m.page,
            line: m.line,
        });
    }

    snippets
}

/// Distinct (page, line) locations per canonical token, most frequent first
pub fn count_tokens(snippets: &[Snippet]) -> Vec<TokenAggregate> {
    let mut locations: BTreeMap<&str, BTreeSet<(u32, u32)>> = BTreeMap::new();
    for snippet in snippets {
        locations
            .entry(snippet.canonical.as_str())
            .or_default()
            .insert((snippet.page, snippet.line));
    }

    let mut tokens: Vec<TokenAggregate> = locations
        .into_iter()
        .map(|(token, at)| TokenAggregate {
            token: token.to_string(),
            count: at.len(),
        })
        .collect();
    tokens.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.token.cmp(&b.token)));
    tokens
}

/// Share of the text taken by the distinct flagged tokens, capped at 1
pub fn match_density(text: &str, tokens: &[TokenAggregate]) -> f64 {
    let len = text.chars().count();
    if len == 0 || tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = tokens.iter().map(|t| t.token.as_str()).collect();
    let covered: usize = unique.iter().map(|t| t.chars().count()).sum();
    (covered as f64 / len as f64).min(1.0)
}
