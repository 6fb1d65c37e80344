//! convenio: command-line access to the comparison and annotation core
//!
//! - `extract`: text of a PDF or DOCX document
//! - `fingerprint`: SHA-256 and size of stored files
//! - `compare`: verdict between two versions, optionally with diff rows
//! - `diff`: line diff of two texts or documents
//! - `annotate`: resolve risk scorer matches over a text
//!
//! Results are printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use version_compare::DiffOptions;

mod commands;
mod config;

use commands::DiffArgs;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "convenio")]
#[command(about = "Compare convenio versions and annotate risk matches")]
struct Args {
    /// TOML file with [extract], [compare] and [annotate] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of a PDF or DOCX document
    Extract { file: PathBuf },

    /// Print SHA-256 and size of each file
    Fingerprint {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
    },

    /// Summarize the differences between two document versions
    Compare {
        base: PathBuf,
        compared: PathBuf,

        #[arg(long, default_value = "1")]
        base_id: u64,

        #[arg(long, default_value = "2")]
        compared_id: u64,

        /// Include line diff rows when text is available
        #[arg(long)]
        rows: bool,
    },

    /// Line diff of two texts (plain text, PDF or DOCX)
    Diff {
        a: PathBuf,
        b: PathBuf,

        /// Clean both texts before diffing
        #[arg(long)]
        normalize: bool,

        /// Hide "Página N de M" header/footer rows
        #[arg(long)]
        hide_page_markers: bool,

        /// Hide whitespace-only rows
        #[arg(long)]
        skip_blank_lines: bool,

        /// Report indices of rows containing this text
        #[arg(long)]
        find: Option<String>,
    },

    /// Locate risk scorer matches in a text and build the review view
    Annotate {
        text: PathBuf,

        /// Scorer JSON: an analysis envelope or a bare list of matches
        matches: PathBuf,

        /// Maximum number of snippets
        #[arg(long)]
        max: Option<usize>,

        /// Extra search term highlighted below every match
        #[arg(long)]
        query: Option<String>,

        /// Print the plain-text summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match args.command {
        Command::Extract { file } => print_json(&commands::extract(&file, &config)?, args.pretty),
        Command::Fingerprint { files } => {
            print_json(&commands::fingerprint(&files)?, args.pretty)
        }
        Command::Compare {
            base,
            compared,
            base_id,
            compared_id,
            rows,
        } => print_json(
            &commands::compare(&base, &compared, (base_id, compared_id), rows, &config)?,
            args.pretty,
        ),
        Command::Diff {
            a,
            b,
            normalize,
            hide_page_markers,
            skip_blank_lines,
            find,
        } => {
            let diff_args = DiffArgs {
                normalize,
                options: DiffOptions {
                    skip_blank_lines: skip_blank_lines || config.compare.diff.skip_blank_lines,
                    hide_page_markers: hide_page_markers || config.compare.diff.hide_page_markers,
                },
                find: find.as_deref(),
            };
            print_json(&commands::diff(&a, &b, diff_args, &config)?, args.pretty)
        }
        Command::Annotate {
            text,
            matches,
            max,
            query,
            summary,
        } => {
            if let Some(max) = max {
                config.annotate.max_snippets = max;
            }
            let annotated = commands::annotate(&text, &matches, query.as_deref(), &config)?;
            if summary {
                println!("{}", annotated.summary());
                Ok(())
            } else {
                print_json(&annotated, args.pretty)
            }
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
