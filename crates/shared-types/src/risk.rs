//! Risk matches reported by the NLP scorer and the annotations derived from them

use serde::{Deserialize, Serialize};

/// Severity attached to a risk match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl Severity {
    /// HIGH(3) > MEDIUM(2) > LOW(1) > NONE(0)
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
            Severity::None => 0,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::None,
        }
    }
}

/// Where a match came from.
///
/// The scorer labels exact hits as "keyword" or "pattern"; both are rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum MatchSource {
    #[default]
    Rule,
    Semantic,
}

impl From<String> for MatchSource {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("semantic") {
            MatchSource::Semantic
        } else {
            MatchSource::Rule
        }
    }
}

/// A flagged token as received from the risk scorer.
///
/// Offsets are character offsets into the analysed text. They are signed
/// because the scorer is best-effort; they get clamped on resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskMatch {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub source: MatchSource,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RiskMatch {
    /// Bare token that has to be located by search
    pub fn token(token: &str, source: MatchSource, severity: Option<Severity>) -> Self {
        Self {
            token: token.to_string(),
            source,
            severity,
            ..Default::default()
        }
    }

    pub fn with_span(mut self, start: i64, end: i64) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Both offsets present and non-empty
    pub fn exact_span(&self) -> Option<(i64, i64)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => Some((start, end)),
            _ => None,
        }
    }
}

/// Full response envelope of the risk scorer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskAnalysis {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub matches: Vec<RiskMatch>,
    #[serde(default)]
    pub summary: serde_json::Value,
}

/// A match pinned to absolute offsets and (page, line) coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMatch {
    pub token: String,
    pub source: MatchSource,
    pub severity: Option<Severity>,
    pub start: usize,
    pub end: usize,
    pub page: u32,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ResolvedMatch {
    pub fn style(&self) -> MatchStyle {
        MatchStyle {
            kind: self.source.into(),
            severity: self.severity.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Rule,
    Semantic,
    /// Free-text search term typed by the reviewer
    Query,
}

impl From<MatchSource> for StyleKind {
    fn from(source: MatchSource) -> Self {
        match source {
            MatchSource::Rule => StyleKind::Rule,
            MatchSource::Semantic => StyleKind::Semantic,
        }
    }
}

/// Display style of a highlighted span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchStyle {
    pub kind: StyleKind,
    pub severity: Severity,
}

/// Context window around one match, deduplicated by (canonical, page, line)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub token: String,
    pub canonical: String,
    pub context: String,
    pub style: MatchStyle,
    /// Match span, character offsets
    pub start: usize,
    pub end: usize,
    pub page: u32,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAggregate {
    pub token: String,
    pub count: usize,
}
