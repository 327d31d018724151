//! Extraction coordinator - orchestrates the worker pool
//!
//! The coordinator is responsible for:
//! - Owning the shared queue, frequency table and completion counter
//! - Starting a fixed number of workers
//! - Joining every worker before the table is read
//! - Exposing a shutdown handle for signal handlers
//! - Final statistics

use crate::engine::queue::JobQueue;
use crate::engine::worker::{aggregate_stats, CompletionCounter, JobTotals, Worker, WorkerContext};
use crate::error::{ConfigError, NgramError, Result, WorkerError};
use crate::ngram::{FilterConfig, FrequencySnapshot, FrequencyTable};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Result of a completed extraction run
#[derive(Debug)]
pub struct ExtractResult {
    /// Final n-gram counts
    pub snapshot: FrequencySnapshot,

    /// Per-outcome job totals
    pub totals: JobTotals,

    /// Jobs declared in the queue
    pub files_total: u64,

    /// Jobs marked done
    pub files_done: u64,

    /// Time taken for the run
    pub duration: Duration,

    /// Whether the run completed (vs was cancelled)
    pub completed: bool,
}

impl ExtractResult {
    /// Share of jobs that could not be read, in percent
    pub fn failure_percent(&self) -> f64 {
        if self.files_total == 0 {
            0.0
        } else {
            self.totals.unreadable as f64 / self.files_total as f64 * 100.0
        }
    }

    /// Fail if the unreadable share is above `max_percent` (no limit if `None`)
    pub fn check_failure_threshold(&self, max_percent: Option<f64>) -> Result<()> {
        match max_percent {
            Some(max_percent) if self.failure_percent() > max_percent => {
                Err(NgramError::FailureThresholdExceeded {
                    failed: self.totals.unreadable,
                    total: self.files_total,
                    max_percent,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Cancels a running extraction from another thread
#[derive(Clone)]
pub struct ShutdownHandle {
    queue: Arc<JobQueue>,
}

impl ShutdownHandle {
    /// Stop workers from taking new jobs; files in progress are finished
    pub fn cancel(&self) {
        self.queue.cancel();
    }
}

/// Coordinates the parallel n-gram extraction
pub struct ExtractCoordinator {
    /// Filter settings shared read-only by every worker
    filter: Arc<FilterConfig>,

    /// Number of workers to start
    worker_count: usize,

    /// Jobs to process
    queue: Arc<JobQueue>,

    /// Shared counts
    table: Arc<FrequencyTable>,

    /// Jobs done so far
    completion: Arc<CompletionCounter>,

    /// Worker threads
    workers: Vec<Worker>,
}

impl ExtractCoordinator {
    /// Create a coordinator over `queue`
    ///
    /// Fails before anything starts if `worker_count` is out of range.
    pub fn new(filter: FilterConfig, worker_count: usize, queue: JobQueue) -> Result<Self> {
        if worker_count == 0 || worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: worker_count,
                max: MAX_WORKERS,
            }
            .into());
        }

        let completion = Arc::new(CompletionCounter::new(queue.total() as u64));

        Ok(Self {
            filter: Arc::new(filter),
            worker_count,
            queue: Arc::new(queue),
            table: Arc::new(FrequencyTable::new()),
            completion,
            workers: Vec::new(),
        })
    }

    /// Get a handle that cancels the run (for signal handlers)
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            queue: Arc::clone(&self.queue),
        }
    }

    /// Get the completion counter (for progress reporting)
    pub fn completion(&self) -> Arc<CompletionCounter> {
        Arc::clone(&self.completion)
    }

    /// Get the job queue
    pub fn queue(&self) -> Arc<JobQueue> {
        Arc::clone(&self.queue)
    }

    /// Run the extraction to exhaustion and return the final counts
    pub fn run(mut self) -> Result<ExtractResult> {
        let start_time = Instant::now();

        info!(
            files = self.queue.total(),
            workers = self.worker_count,
            n = self.filter.n().get(),
            "Starting n-gram extraction"
        );

        if let Err(e) = self.spawn_workers() {
            // Release the workers already started before reporting
            self.queue.cancel();
            self.join_workers()?;
            return Err(e);
        }

        self.join_workers()?;

        let totals = aggregate_stats(&self.workers);
        let files_done = self.completion.completed();
        let completed = !self.queue.is_cancelled() && files_done == self.completion.total();
        let duration = start_time.elapsed();

        // Workers are joined, so their table handles are gone
        drop(self.workers);
        let snapshot = match Arc::try_unwrap(self.table) {
            Ok(table) => table.into_snapshot(),
            Err(shared) => shared.snapshot(),
        };

        info!(
            files = files_done,
            unreadable = totals.unreadable,
            empty = totals.empty,
            distinct = snapshot.len(),
            ngrams = totals.ngrams,
            duration_secs = duration.as_secs(),
            "Extraction completed"
        );

        Ok(ExtractResult {
            snapshot,
            totals,
            files_total: self.completion.total(),
            files_done,
            duration,
            completed,
        })
    }

    /// Spawn worker threads
    fn spawn_workers(&mut self) -> Result<()> {
        let context = WorkerContext {
            filter: Arc::clone(&self.filter),
            queue: Arc::clone(&self.queue),
            table: Arc::clone(&self.table),
            completion: Arc::clone(&self.completion),
        };

        for id in 0..self.worker_count {
            let worker = Worker::spawn(id, context.clone())?;
            self.workers.push(worker);
        }

        info!(count = self.workers.len(), "Workers spawned");
        Ok(())
    }

    /// Join every worker; the first panic is reported once all have exited
    fn join_workers(&mut self) -> Result<()> {
        let mut first_failure: Option<WorkerError> = None;

        for worker in &mut self.workers {
            if let Err(e) = worker.join() {
                error!(worker = worker.id(), error = %e, "Worker failed to join cleanly");
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => {
                warn!("Discarding partial counts after worker failure");
                Err(e.into())
            }
            None => Ok(()),
        }
    }
}
