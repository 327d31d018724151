//! Error types for ngram-counter
//!
//! This module defines the error hierarchy that covers:
//! - Configuration and CLI errors (fatal, before any worker starts)
//! - Corpus enumeration errors
//! - Job queue misuse
//! - Worker thread errors
//! - Output (CSV) errors
//!
//! Per-file failures are not errors at this level. They are resolved into a
//! [`JobOutcome`] by the worker and the run carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the ngram-counter application
#[derive(Error, Debug)]
pub enum NgramError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Corpus enumeration errors
    #[error("Enumeration error: {0}")]
    Enumerate(#[from] EnumerateError),

    /// Job queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),

    /// Output writer errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Enumeration found nothing to process
    #[error("No files to process under '{root}' with extension '.{extension}'")]
    NoInputFiles { root: PathBuf, extension: String },

    /// Too many files could not be read
    #[error("{failed} of {total} files could not be read, above the {max_percent}% limit")]
    FailureThresholdExceeded {
        failed: u64,
        total: u64,
        max_percent: f64,
    },

    /// Interrupted by signal
    #[error("Operation interrupted by signal")]
    Interrupted,
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid n-gram width
    #[error("Invalid n-gram width {n}: must be a positive integer")]
    InvalidWidth { n: usize },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Root folder missing or not a directory
    #[error("'{path}' is not a valid directory")]
    InvalidRoot { path: PathBuf },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Delimiter is not a single ASCII character
    #[error("Invalid delimiter '{delimiter}': must be a single ASCII character")]
    InvalidDelimiter { delimiter: String },

    /// Failure threshold outside 0..=100
    #[error("Invalid failure threshold {percent}: must be between 0 and 100")]
    InvalidFailureThreshold { percent: f64 },
}

/// Corpus enumeration errors
#[derive(Error, Debug)]
pub enum EnumerateError {
    /// The walk could not start at the root
    #[error("Failed to read root directory '{path}': {reason}")]
    RootUnreadable { path: PathBuf, reason: String },
}

/// Job queue errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// More jobs enqueued than the queue's declared total
    #[error("Queue already holds its declared total of {total} jobs")]
    Overfilled { total: usize },

    /// Enqueue after the queue was closed or cancelled
    #[error("Queue is closed to new jobs")]
    Closed,
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },
}

/// Output writer errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error while creating or flushing the output
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for NgramError
pub type Result<T> = std::result::Result<T, NgramError>;

/// Represents the outcome of processing a single file job
#[derive(Debug)]
pub enum JobOutcome {
    /// File was read and its n-grams recorded
    Counted {
        path: PathBuf,
        bytes: u64,
        ngrams: u64,
    },

    /// File opened but held no content
    Empty { path: PathBuf },

    /// File could not be opened or read
    Unreadable { path: PathBuf, reason: String },
}

impl JobOutcome {
    /// Returns true if the file contributed to the table (possibly zero n-grams)
    pub fn is_counted(&self) -> bool {
        matches!(self, JobOutcome::Counted { .. })
    }

    /// Returns the path associated with this outcome
    pub fn path(&self) -> &std::path::Path {
        match self {
            JobOutcome::Counted { path, .. } => path,
            JobOutcome::Empty { path } => path,
            JobOutcome::Unreadable { path, .. } => path,
        }
    }
}
