//! Comparison of two uploaded versions of a convenio
//!
//! - [`diff_lines`]: line diff with page/line provenance for the side-by-side view
//! - [`text_similarity`]: character similarity percentage
//! - [`ComparisonSummarizer`]: fingerprints, similarity and the stored verdict

pub mod config;
pub mod line_diff;
pub mod normalize;
pub mod similarity;
pub mod summarizer;

pub use config::CompareConfig;
pub use line_diff::{diff_lines, is_page_marker_line, page_from_line, DiffOptions, LineDiffer};
pub use normalize::{find_rows, normalize_for_diff, DiffStats};
pub use similarity::text_similarity;
pub use summarizer::{ComparisonReport, ComparisonSummarizer};
