//! Subcommand implementations; each returns a serializable result

use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use doc_extract::{fingerprint_reader, Extraction, Fingerprint, TextExtractor};
use risk_annotate::AnnotatedText;
use serde::{Deserialize, Serialize};
use shared_types::{DiffRow, Document, DocumentFormat, DocumentVersion, RiskAnalysis, RiskMatch};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use version_compare::{
    find_rows, normalize_for_diff, ComparisonSummarizer, DiffOptions, DiffStats, LineDiffer,
};

#[derive(Debug, Serialize)]
pub struct ExtractOutput {
    pub path: String,
    pub format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsupported: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FingerprintOutput {
    pub path: String,
    #[serde(flatten)]
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Serialize)]
pub struct DiffOutput {
    pub stats: DiffStats,
    pub rows: Vec<DiffRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found: Option<Vec<usize>>,
}

/// What the risk scorer sends back: a full envelope or just its matches
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ScorerResponse {
    Matches(Vec<RiskMatch>),
    Analysis(RiskAnalysis),
}

impl ScorerResponse {
    pub fn into_analysis(self) -> RiskAnalysis {
        match self {
            ScorerResponse::Matches(matches) => RiskAnalysis {
                matches,
                ..Default::default()
            },
            ScorerResponse::Analysis(analysis) => analysis,
        }
    }
}

fn read_document(path: &Path) -> Result<Document> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read document: {}", path.display()))?;
    Ok(Document::from_stored(&path.to_string_lossy(), bytes))
}

/// Text of a document, or the contents of a plain text file
fn load_text(path: &Path, extractor: &TextExtractor) -> Result<String> {
    let document = read_document(path)?;
    match document.format {
        DocumentFormat::Pdf | DocumentFormat::Docx => match extractor.extract(&document) {
            Extraction::Text(text) => Ok(text),
            Extraction::Unsupported(e) => {
                bail!("No text could be extracted from {}: {}", path.display(), e)
            }
        },
        DocumentFormat::Other(_) => String::from_utf8(document.bytes)
            .with_context(|| format!("{} is not UTF-8 text", path.display())),
    }
}

pub fn extract(path: &Path, config: &AppConfig) -> Result<ExtractOutput> {
    let document = read_document(path)?;
    let extraction = TextExtractor::new(config.extract.clone()).extract(&document);

    let (text, unsupported) = match extraction {
        Extraction::Text(text) => (Some(text), None),
        Extraction::Unsupported(e) => (None, Some(e.to_string())),
    };
    Ok(ExtractOutput {
        path: path.display().to_string(),
        format: document.format.extension().to_string(),
        text,
        unsupported,
    })
}

pub fn fingerprint(paths: &[PathBuf]) -> Result<Vec<FingerprintOutput>> {
    paths
        .iter()
        .map(|path| {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            let fingerprint = fingerprint_reader(BufReader::new(file))
                .with_context(|| format!("Failed to read {}", path.display()))?;
            debug!(path = %path.display(), size = fingerprint.size, "fingerprinted");
            Ok(FingerprintOutput {
                path: path.display().to_string(),
                fingerprint,
            })
        })
        .collect()
}

pub fn compare(
    base: &Path,
    compared: &Path,
    ids: (u64, u64),
    with_rows: bool,
    config: &AppConfig,
) -> Result<serde_json::Value> {
    let base = DocumentVersion::new(ids.0, 1, read_document(base)?);
    let compared = DocumentVersion::new(ids.1, 2, read_document(compared)?);
    let summarizer = ComparisonSummarizer::new(
        config.compare.clone(),
        TextExtractor::new(config.extract.clone()),
    );

    let value = if with_rows {
        serde_json::to_value(summarizer.report(&base, &compared))?
    } else {
        serde_json::to_value(summarizer.summarize(&base, &compared))?
    };
    Ok(value)
}

pub struct DiffArgs<'a> {
    pub normalize: bool,
    pub options: DiffOptions,
    pub find: Option<&'a str>,
}

pub fn diff(a: &Path, b: &Path, args: DiffArgs<'_>, config: &AppConfig) -> Result<DiffOutput> {
    let extractor = TextExtractor::new(config.extract.clone());
    let mut text_a = load_text(a, &extractor)?;
    let mut text_b = load_text(b, &extractor)?;
    if args.normalize {
        text_a = normalize_for_diff(&text_a);
        text_b = normalize_for_diff(&text_b);
    }

    let rows = LineDiffer::new(args.options)
        .with_timeout(config.compare.diff_timeout())
        .diff(&text_a, &text_b);
    let stats = DiffStats::from_rows(&rows);
    info!(
        equal = stats.equal,
        deleted = stats.deleted,
        inserted = stats.inserted,
        "diff complete"
    );

    Ok(DiffOutput {
        found: args.find.map(|q| find_rows(&rows, q)),
        stats,
        rows,
    })
}

pub fn annotate(
    text_path: &Path,
    matches_path: &Path,
    query: Option<&str>,
    config: &AppConfig,
) -> Result<AnnotatedText> {
    let text = load_text(text_path, &TextExtractor::new(config.extract.clone()))?;
    let json = fs::read_to_string(matches_path)
        .with_context(|| format!("Failed to read matches: {}", matches_path.display()))?;
    let analysis = parse_scorer_response(&json)?;

    Ok(risk_annotate::annotate_analysis(
        &text,
        &analysis,
        query,
        &config.annotate,
    ))
}

pub fn parse_scorer_response(json: &str) -> Result<RiskAnalysis> {
    let response: ScorerResponse =
        serde_json::from_str(json).context("Failed to parse risk scorer response")?;
    Ok(response.into_analysis())
}
