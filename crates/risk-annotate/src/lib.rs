//! Risk match annotation for the review view
//!
//! Takes the extracted text of one version plus the matches reported by the
//! risk scorer and produces everything the review page renders:
//! resolved matches, the highlight layer, deduplicated context snippets,
//! the token table and a short summary.

pub mod canonical;
pub mod config;
pub mod highlight;
pub mod line_index;
pub mod locator;
pub mod snippets;

pub use canonical::{canonical_token, fold};
pub use config::AnnotateConfig;
pub use highlight::{highlight, HighlightSegment};
pub use line_index::{LineIndex, LineRecord};
pub use locator::{locate, MatchLocator};
pub use snippets::{
    count_tokens, extract_snippets, extract_snippets_with, match_density, ContextWindow,
};

use serde::{Deserialize, Serialize};
use shared_types::{
    MatchSource, ResolvedMatch, RiskAnalysis, RiskMatch, Snippet, TokenAggregate,
};
use tracing::debug;

/// Everything the review page shows for one analysed text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub matches: Vec<ResolvedMatch>,
    pub segments: Vec<HighlightSegment>,
    pub snippets: Vec<Snippet>,
    pub tokens: Vec<TokenAggregate>,
    pub density: f64,
    /// Scorer matches by source, before resolution
    pub rule_count: usize,
    pub semantic_count: usize,
}

impl AnnotatedText {
    /// Plain-text summary for pasting into a report
    pub fn summary(&self) -> String {
        let confidence = self.score.unwrap_or(0.0).clamp(0.0, 1.0) * 100.0;
        [
            format!("Risk level: {}", self.risk_level.as_deref().unwrap_or("-")),
            format!("Confidence: {:.0}%", confidence),
            format!("Rule matches: {}", self.rule_count),
            format!("Semantic matches: {}", self.semantic_count),
            format!("Approximate density: {:.1}%", self.density * 100.0),
        ]
        .join("\n")
    }
}

/// Resolve, highlight and summarize `matches` over `text`
pub fn annotate(
    text: &str,
    matches: &[RiskMatch],
    query: Option<&str>,
    config: &AnnotateConfig,
) -> AnnotatedText {
    let resolved = locate(text, matches);
    let segments = highlight(text, &resolved, query);
    let snippets = extract_snippets_with(text, &resolved, config.max_snippets, config.window());
    let tokens = count_tokens(&snippets);
    let density = match_density(text, &tokens);

    let semantic_count = matches
        .iter()
        .filter(|m| m.source == MatchSource::Semantic)
        .count();

    debug!(
        matches = matches.len(),
        resolved = resolved.len(),
        snippets = snippets.len(),
        "text annotated"
    );

    AnnotatedText {
        risk_level: None,
        score: None,
        matches: resolved,
        segments,
        snippets,
        tokens,
        density,
        rule_count: matches.len() - semantic_count,
        semantic_count,
    }
}

/// Annotate a full scorer response, carrying its level and score along
pub fn annotate_analysis(
    text: &str,
    analysis: &RiskAnalysis,
    query: Option<&str>,
    config: &AnnotateConfig,
) -> AnnotatedText {
    AnnotatedText {
        risk_level: analysis.risk_level.clone(),
        score: analysis.score,
        ..annotate(text, &analysis.matches, query, config)
    }
}
