//! Line diff rows and persisted comparison records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag of a diff row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffOp {
    Equal,
    Deleted,
    Inserted,
}

impl DiffOp {
    /// Row consumes a line of the base (A) side
    pub fn on_base(self) -> bool {
        matches!(self, DiffOp::Equal | DiffOp::Deleted)
    }

    /// Row consumes a line of the compared (B) side
    pub fn on_compared(self) -> bool {
        matches!(self, DiffOp::Equal | DiffOp::Inserted)
    }
}

/// One line of a line-granularity comparison, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub op: DiffOp,
    pub a_line: Option<u32>,
    pub b_line: Option<u32>,
    pub a_page: Option<u32>,
    pub b_page: Option<u32>,
    /// Line text without its line-feed
    pub text: String,
}

/// Raw evidence stored alongside a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffDetails {
    pub hash_base: String,
    pub hash_compared: String,
    pub size_base: u64,
    pub size_compared: u64,
    /// Character similarity in percent, absent when text was unavailable
    pub text_similarity_percent: Option<f64>,
}

/// Comparison between two adjacent versions. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub base_version_id: u64,
    pub compared_version_id: u64,
    pub diff_details: DiffDetails,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
}
