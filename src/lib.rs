//! ngram-counter - Parallel Character N-gram Counter
//!
//! Counts fixed-length character n-grams over every text file under a folder
//! and writes the totals to a delimited file.
//!
//! # Features
//!
//! - **Parallel Extraction**: A fixed pool of worker threads drains a shared
//!   job queue, one file per job.
//!
//! - **Lost-update-free Counting**: All workers merge into one concurrent
//!   table of atomic counters.
//!
//! - **Allow-list Filtering**: Optionally keep only the listed characters
//!   before sliding the window.
//!
//! - **Deterministic Termination**: The queue knows how many jobs the run
//!   has, so workers stop exactly when all of them are taken.
//!
//! # Architecture
//!
//! ```text
//!  FOLDER ──► enumerate ──► JobQueue ──► Workers (W threads) ──► FrequencyTable
//!             (walkdir,      (counted      filter → window          │
//!              extension,     exhaustion)      │                    ▼
//!              exclusions)                     ▼               output (csv)
//!                                      CompletionCounter ──► ProgressReporter
//! ```
//!
//! # Example
//!
//! ```bash
//! # Trigrams of every .txt file under corpus/
//! ngram-counter corpus/
//!
//! # Letter bigrams with 8 workers
//! ngram-counter corpus/ --n 2 --whitelist abcdefghijklmnopqrstuvwxyz -t 8
//! ```

pub mod config;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod ngram;
pub mod output;
pub mod progress;

pub use config::{CliArgs, ExtractConfig};
pub use engine::{ExtractCoordinator, ExtractResult, FileJob, JobQueue};
pub use error::{NgramError, Result};
pub use ngram::{FilterConfig, FrequencySnapshot, FrequencyTable};
