//! Configuration types for ngram-counter
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation

use crate::engine::{DEFAULT_WORKERS, MAX_WORKERS};
use crate::error::ConfigError;
use crate::ngram::FilterConfig;
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default n-gram width
pub const DEFAULT_WIDTH: usize = 3;

/// Parallel character n-gram counter
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ngram-counter",
    version,
    about = "Count character n-grams across a folder of text files",
    long_about = "Recursively collects files with the given extension under FOLDER, \
                  counts every n-gram of their (optionally filtered) text with a pool \
                  of worker threads and writes the totals to a delimited file sorted \
                  by decreasing count.",
    after_help = "EXAMPLES:\n    \
        ngram-counter corpus/\n    \
        ngram-counter corpus/ --n 2 --whitelist abcdefghijklmnopqrstuvwxyz\n    \
        ngram-counter corpus/ --threads 8 --exclude corpus/drafts -o counts.tsv"
)]
pub struct CliArgs {
    /// Folder to scan recursively
    #[arg(value_name = "FOLDER")]
    pub folder: PathBuf,

    /// Size of the n-grams
    #[arg(short = 'n', long = "n", default_value_t = DEFAULT_WIDTH, value_name = "N")]
    pub n: usize,

    /// Characters to keep before counting (empty keeps everything)
    #[arg(long, visible_alias = "allow-list", default_value = "", value_name = "CHARS")]
    pub whitelist: String,

    /// Number of worker threads
    #[arg(
        short = 't',
        long,
        visible_alias = "workers",
        default_value_t = DEFAULT_WORKERS,
        value_name = "NUM"
    )]
    pub threads: usize,

    /// Exclude a folder and everything below it (can be repeated)
    #[arg(long = "exclude", value_name = "DIR", action = clap::ArgAction::Append)]
    pub exclude: Vec<PathBuf>,

    /// Extension of the files to process
    #[arg(short = 'e', long, default_value = "txt", value_name = "EXT")]
    pub extension: String,

    /// Output file
    #[arg(short, long, default_value = "ngrams.csv", value_name = "FILE")]
    pub output: PathBuf,

    /// Field delimiter of the output file
    #[arg(long, default_value = "\t", value_name = "CHAR")]
    pub delimiter: String,

    /// Write n-grams in table order instead of by decreasing count
    #[arg(long)]
    pub no_sort: bool,

    /// Fail the run if more than this percentage of files cannot be read
    #[arg(long, value_name = "PCT")]
    pub max_failure_percent: Option<f64>,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Root folder of the corpus
    pub root: PathBuf,

    /// Folders excluded from enumeration
    pub excluded: Vec<PathBuf>,

    /// File extension without the leading dot
    pub extension: String,

    /// Allow-list and window width
    pub filter: FilterConfig,

    /// Number of worker threads
    pub worker_count: usize,

    /// Output file path
    pub output_path: PathBuf,

    /// Output field delimiter
    pub delimiter: u8,

    /// Sort output by decreasing count
    pub sort_output: bool,

    /// Maximum share of unreadable files, in percent
    pub max_failure_percent: Option<f64>,

    /// Show progress indicator
    pub show_progress: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl ExtractConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let n = NonZeroUsize::new(args.n).ok_or(ConfigError::InvalidWidth { n: args.n })?;

        if args.threads == 0 || args.threads > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.threads,
                max: MAX_WORKERS,
            });
        }

        if !args.folder.is_dir() {
            return Err(ConfigError::InvalidRoot { path: args.folder });
        }

        let delimiter = parse_delimiter(&args.delimiter)?;

        if let Some(percent) = args.max_failure_percent {
            if !(0.0..=100.0).contains(&percent) {
                return Err(ConfigError::InvalidFailureThreshold { percent });
            }
        }

        // Validate output path
        if let Some(parent) = args.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidOutputPath {
                    path: args.output.clone(),
                    reason: format!("Parent directory '{}' does not exist", parent.display()),
                });
            }
        }
        if args.output.is_dir() {
            return Err(ConfigError::InvalidOutputPath {
                path: args.output.clone(),
                reason: "Path is a directory".to_string(),
            });
        }

        Ok(Self {
            root: args.folder,
            excluded: args.exclude,
            extension: normalize_extension(&args.extension),
            filter: FilterConfig::new(&args.whitelist, n),
            worker_count: args.threads,
            output_path: args.output,
            delimiter,
            sort_output: !args.no_sort,
            max_failure_percent: args.max_failure_percent,
            show_progress: !args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Strip the leading dot, so `.txt` and `txt` mean the same
fn normalize_extension(extension: &str) -> String {
    extension.trim_start_matches('.').to_string()
}

/// Accept a single ASCII character; `\t` spelled out also means tab
fn parse_delimiter(delimiter: &str) -> Result<u8, ConfigError> {
    if delimiter == "\\t" {
        return Ok(b'\t');
    }
    match delimiter.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::InvalidDelimiter {
            delimiter: delimiter.to_string(),
        }),
    }
}
