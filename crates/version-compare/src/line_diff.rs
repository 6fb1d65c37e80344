//! Line-granularity diff with page and line provenance
//!
//! Both texts are split on `\n` and the line sequences are diffed with
//! Myers. Short runs of common lines caught between two changes are then
//! folded into a single change, so that a rewritten clause shows up as one
//! block instead of a comb of one-line edits.
//!
//! Page numbers are a heuristic: each side keeps a sticky page that starts
//! at 1 and jumps whenever a line mentions "página N" / "page N".

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_types::{DiffOp, DiffRow};
use similar::{Algorithm, DiffTag, TextDiff};
use std::ops::Range;
use std::time::Duration;
use tracing::debug;

lazy_static! {
    static ref PAGE_REF: Regex = Regex::new(r"(?i)(p[áa]gina|page)\s+(\d+)").unwrap();

    /// Header or footer consisting only of "Página 2" / "Página 2 de 3"
    static ref PAGE_MARKER: Regex =
        Regex::new(r"(?i)^p[áa]gina\s+\d+(\s+de\s+\d+)?$").unwrap();
}

/// Page number mentioned by a line, if any
pub fn page_from_line(line: &str) -> Option<u32> {
    PAGE_REF
        .captures(line)
        .and_then(|caps| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

pub fn is_page_marker_line(line: &str) -> bool {
    PAGE_MARKER.is_match(line.trim())
}

/// Row filters applied after page tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Drop rows whose text is only whitespace
    pub skip_blank_lines: bool,
    /// Drop header/footer rows such as "Página 2 de 3"
    pub hide_page_markers: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LineDiffer {
    options: DiffOptions,
    timeout: Option<Duration>,
}

impl LineDiffer {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            timeout: None,
        }
    }

    /// Bound the Myers search; past the deadline the diff is still valid but coarser
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn diff(&self, text_a: &str, text_b: &str) -> Vec<DiffRow> {
        let lines_a = split_lines(text_a);
        let lines_b = split_lines(text_b);

        let mut config = TextDiff::configure();
        config.algorithm(Algorithm::Myers);
        if let Some(timeout) = self.timeout {
            config.timeout(timeout);
        }
        let diff = config.diff_slices(&lines_a, &lines_b);

        let mut chunks = collect_chunks(diff.ops().iter().map(|op| op.as_tag_tuple()));
        let before = chunks.len();
        absorb_short_equalities(&mut chunks, &lines_a, &lines_b);
        debug!(
            lines_a = lines_a.len(),
            lines_b = lines_b.len(),
            chunks = chunks.len(),
            absorbed = before - chunks.len(),
            "line diff computed"
        );

        let mut writer = RowWriter::new(self.options);
        for chunk in &chunks {
            if chunk.equal {
                for line in &lines_a[chunk.old.clone()] {
                    writer.push(DiffOp::Equal, line);
                }
            } else {
                for line in &lines_a[chunk.old.clone()] {
                    writer.push(DiffOp::Deleted, line);
                }
                for line in &lines_b[chunk.new.clone()] {
                    writer.push(DiffOp::Inserted, line);
                }
            }
        }
        writer.rows
    }
}

/// Diff two texts line by line with default options and no deadline
pub fn diff_lines(text_a: &str, text_b: &str) -> Vec<DiffRow> {
    LineDiffer::default().diff(text_a, text_b)
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

/// A run of equal lines, or a change replacing `old` lines with `new` lines
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    equal: bool,
    old: Range<usize>,
    new: Range<usize>,
}

fn collect_chunks<I>(ops: I) -> Vec<Chunk>
where
    I: IntoIterator<Item = (DiffTag, Range<usize>, Range<usize>)>,
{
    let mut chunks: Vec<Chunk> = Vec::new();
    for (tag, old, new) in ops {
        let equal = tag == DiffTag::Equal;
        match chunks.last_mut() {
            Some(last) if last.equal == equal => {
                last.old.end = old.end;
                last.new.end = new.end;
            }
            _ => chunks.push(Chunk { equal, old, new }),
        }
    }
    chunks
}

/// Characters plus one terminator per line
fn weight(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.chars().count() + 1).sum()
}

/// Fold an equal run into its neighbours when it is no heavier than the
/// larger side of both surrounding changes. Repeats until nothing moves.
fn absorb_short_equalities(chunks: &mut Vec<Chunk>, lines_a: &[&str], lines_b: &[&str]) {
    let change_weight = |chunk: &Chunk| {
        weight(&lines_a[chunk.old.clone()]).max(weight(&lines_b[chunk.new.clone()]))
    };

    loop {
        let found = (1..chunks.len().saturating_sub(1)).find(|&i| {
            let (prev, eq, next) = (&chunks[i - 1], &chunks[i], &chunks[i + 1]);
            if !eq.equal || prev.equal || next.equal {
                return false;
            }
            let eq_weight = weight(&lines_a[eq.old.clone()]);
            eq_weight <= change_weight(prev) && eq_weight <= change_weight(next)
        });

        let Some(i) = found else { break };
        let next = chunks.remove(i + 1);
        chunks.remove(i);
        let merged = &mut chunks[i - 1];
        merged.old.end = next.old.end;
        merged.new.end = next.new.end;
    }
}

struct RowWriter {
    options: DiffOptions,
    a_line: u32,
    b_line: u32,
    a_page: u32,
    b_page: u32,
    rows: Vec<DiffRow>,
}

impl RowWriter {
    fn new(options: DiffOptions) -> Self {
        Self {
            options,
            a_line: 1,
            b_line: 1,
            a_page: 1,
            b_page: 1,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, op: DiffOp, text: &str) {
        let on_a = op.on_base();
        let on_b = op.on_compared();

        if let Some(page) = page_from_line(text) {
            if on_a {
                self.a_page = page;
            }
            if on_b {
                self.b_page = page;
            }
        }

        let a_line = on_a.then_some(self.a_line);
        let b_line = on_b.then_some(self.b_line);
        if on_a {
            self.a_line += 1;
        }
        if on_b {
            self.b_line += 1;
        }

        if self.is_hidden(text) {
            return;
        }

        self.rows.push(DiffRow {
            op,
            a_line,
            b_line,
            a_page: on_a.then_some(self.a_page),
            b_page: on_b.then_some(self.b_page),
            text: text.to_string(),
        });
    }

    fn is_hidden(&self, text: &str) -> bool {
        (self.options.skip_blank_lines && text.trim().is_empty())
            || (self.options.hide_page_markers && is_page_marker_line(text))
    }
}
