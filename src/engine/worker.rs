//! Worker thread logic for parallel n-gram extraction
//!
//! Each worker:
//! - Pulls file jobs from the shared job queue until it is exhausted
//! - Reads the file, filters it and slides the n-gram window over it
//! - Records every n-gram in the shared frequency table
//! - Bumps the completion counter once per job, whatever the outcome

use crate::engine::queue::{FileJob, JobQueue};
use crate::error::{JobOutcome, WorkerError};
use crate::ngram::{ngrams, FilterConfig, FrequencyTable};
use std::fs;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

/// Number of jobs fully processed, alongside the fixed total
///
/// Polled by the progress reporter while the run is in flight.
#[derive(Debug)]
pub struct CompletionCounter {
    done: AtomicU64,
    total: u64,
}

impl CompletionCounter {
    /// Create a zeroed counter for a run of `total` jobs
    pub fn new(total: u64) -> Self {
        Self {
            done: AtomicU64::new(0),
            total,
        }
    }

    /// Record one finished job
    pub fn record(&self) {
        self.done.fetch_add(1, Ordering::Release);
    }

    /// Jobs finished so far
    pub fn completed(&self) -> u64 {
        self.done.load(Ordering::Acquire)
    }

    /// Total jobs in the run
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Check if every job has been finished
    pub fn is_complete(&self) -> bool {
        self.completed() >= self.total
    }
}

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Files read and counted
    pub files_counted: AtomicU64,

    /// Files that were empty
    pub files_empty: AtomicU64,

    /// Files that could not be opened or read
    pub files_unreadable: AtomicU64,

    /// Bytes read from counted files
    pub bytes_read: AtomicU64,

    /// N-grams recorded in the table
    pub ngrams_recorded: AtomicU64,
}

impl WorkerStats {
    fn record_counted(&self, bytes: u64, ngrams: u64) {
        self.files_counted.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
        self.ngrams_recorded.fetch_add(ngrams, Ordering::Relaxed);
    }

    fn record_empty(&self) {
        self.files_empty.fetch_add(1, Ordering::Relaxed);
    }

    fn record_unreadable(&self) {
        self.files_unreadable.fetch_add(1, Ordering::Relaxed);
    }
}

/// Totals over all workers of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobTotals {
    pub counted: u64,
    pub empty: u64,
    pub unreadable: u64,
    pub bytes: u64,
    pub ngrams: u64,
}

impl JobTotals {
    /// Jobs resolved, whatever their outcome
    pub fn files(&self) -> u64 {
        self.counted + self.empty + self.unreadable
    }
}

/// Everything a worker shares with the rest of the run
#[derive(Clone)]
pub struct WorkerContext {
    pub filter: Arc<FilterConfig>,
    pub queue: Arc<JobQueue>,
    pub table: Arc<FrequencyTable>,
    pub completion: Arc<CompletionCounter>,
}

/// A worker thread that processes file jobs
pub struct Worker {
    /// Worker ID
    id: usize,

    /// Thread handle
    handle: Option<JoinHandle<()>>,

    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(id: usize, context: WorkerContext) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("ngram-{}", id))
            .spawn(move || worker_loop(id, context, stats_clone))
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    /// Wait for the worker to finish; later calls return `Ok(())`
    pub fn join(&mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|payload| WorkerError::Panicked {
                id: self.id,
                message: panic_message(payload.as_ref()),
            }),
            None => Ok(()),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Worker thread panicked".into()
    }
}

/// Main worker loop
fn worker_loop(id: usize, context: WorkerContext, stats: Arc<WorkerStats>) {
    debug!(worker = id, "Worker starting");

    while let Some(job) = context.queue.take() {
        let outcome = process_job(&job, &context.filter, &context.table);

        match &outcome {
            JobOutcome::Counted { path, bytes, ngrams } => {
                trace!(worker = id, path = %path.display(), bytes, ngrams, "File counted");
                stats.record_counted(*bytes, *ngrams);
            }
            JobOutcome::Empty { path } => {
                warn!(worker = id, path = %path.display(), "Empty file");
                stats.record_empty();
            }
            JobOutcome::Unreadable { path, reason } => {
                warn!(worker = id, path = %path.display(), error = %reason, "Error opening file");
                stats.record_unreadable();
            }
        }

        context.completion.record();
    }

    info!(
        worker = id,
        files = stats.files_counted.load(Ordering::Relaxed),
        ngrams = stats.ngrams_recorded.load(Ordering::Relaxed),
        "Worker finished"
    );
}

/// Process a single file job
///
/// Never fails: unreadable and empty files are reported through the outcome.
pub fn process_job(job: &FileJob, filter: &FilterConfig, table: &FrequencyTable) -> JobOutcome {
    let path = job.path().to_path_buf();

    let raw = match fs::read(&path) {
        Ok(raw) => raw,
        Err(e) => {
            return JobOutcome::Unreadable {
                path,
                reason: e.to_string(),
            }
        }
    };

    if raw.is_empty() {
        return JobOutcome::Empty { path };
    }

    let text = String::from_utf8_lossy(&raw);
    let filtered = filter.filter(&text);
    let recorded = table.record_all(ngrams(&filtered, filter.n()));

    JobOutcome::Counted {
        path,
        bytes: raw.len() as u64,
        ngrams: recorded,
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(workers: &[Worker]) -> JobTotals {
    workers.iter().fold(JobTotals::default(), |mut totals, worker| {
        let stats = worker.stats();
        totals.counted += stats.files_counted.load(Ordering::Relaxed);
        totals.empty += stats.files_empty.load(Ordering::Relaxed);
        totals.unreadable += stats.files_unreadable.load(Ordering::Relaxed);
        totals.bytes += stats.bytes_read.load(Ordering::Relaxed);
        totals.ngrams += stats.ngrams_recorded.load(Ordering::Relaxed);
        totals
    })
}
