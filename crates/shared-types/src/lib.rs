pub mod diff;
pub mod document;
pub mod risk;

pub use diff::{Comparison, DiffDetails, DiffOp, DiffRow};
pub use document::{Document, DocumentFormat, DocumentVersion};
pub use risk::{
    MatchSource, MatchStyle, ResolvedMatch, RiskAnalysis, RiskMatch, Severity, Snippet,
    StyleKind, TokenAggregate,
};
