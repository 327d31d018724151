//! Job queue with counted exhaustion
//!
//! The queue knows up front how many jobs the run will see. A worker that
//! finds it empty does not take that as "done": it compares the number of
//! jobs ever taken against the declared total and only gives up once they
//! match (or the queue was closed or cancelled). Until then it sleeps on a
//! condition variable, so population and draining may overlap safely.
//!
//! All state changes happen under one mutex, so a job is handed to exactly
//! one caller.

use crate::error::QueueError;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One input file awaiting extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    path: PathBuf,
}

impl FileJob {
    /// Create a job for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take back the path
    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<FileJob>,
    enqueued: usize,
    taken: usize,
    closed: bool,
    cancelled: bool,
}

impl QueueState {
    fn is_exhausted(&self, total: usize) -> bool {
        self.pending.is_empty() && (self.taken >= total || self.closed)
    }
}

/// Thread-safe queue of file jobs with a fixed declared total
#[derive(Debug)]
pub struct JobQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    total: usize,
}

impl JobQueue {
    /// Create an empty queue that expects `total` jobs
    pub fn with_total(total: usize) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            total,
        }
    }

    /// Create a fully populated queue; the total is the number of jobs
    pub fn from_jobs<I>(jobs: I) -> Self
    where
        I: IntoIterator<Item = FileJob>,
    {
        let pending: VecDeque<FileJob> = jobs.into_iter().collect();
        let total = pending.len();

        Self {
            state: Mutex::new(QueueState {
                enqueued: total,
                pending,
                ..QueueState::default()
            }),
            available: Condvar::new(),
            total,
        }
    }

    /// Append a job and wake one waiting worker
    pub fn enqueue(&self, job: FileJob) -> Result<(), QueueError> {
        let mut state = self.state.lock();

        if state.closed || state.cancelled {
            return Err(QueueError::Closed);
        }
        if state.enqueued >= self.total {
            return Err(QueueError::Overfilled { total: self.total });
        }

        state.pending.push_back(job);
        state.enqueued += 1;
        drop(state);

        self.available.notify_one();
        Ok(())
    }

    /// Take the next job, blocking while the queue is empty but not exhausted
    ///
    /// Returns `None` once every declared job has been taken, the queue was
    /// closed and drained, or the queue was cancelled.
    pub fn take(&self) -> Option<FileJob> {
        let mut state = self.state.lock();

        loop {
            if state.cancelled {
                return None;
            }

            if let Some(job) = state.pending.pop_front() {
                state.taken += 1;
                let drained = state.is_exhausted(self.total);
                drop(state);

                // Waiters can only leave once the last job is gone
                if drained {
                    self.available.notify_all();
                }
                return Some(job);
            }

            if state.is_exhausted(self.total) {
                return None;
            }

            self.available.wait(&mut state);
        }
    }

    /// Declare that no more jobs will be enqueued
    ///
    /// A closed queue is exhausted as soon as it is empty, even if fewer than
    /// the declared total were ever enqueued.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.available.notify_all();
    }

    /// Stop handing out jobs and release every blocked worker
    pub fn cancel(&self) {
        self.state.lock().cancelled = true;
        self.available.notify_all();
    }

    /// Declared total number of jobs
    pub fn total(&self) -> usize {
        self.total
    }

    /// Jobs enqueued but not yet taken
    pub fn remaining(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Jobs handed out so far
    pub fn taken(&self) -> usize {
        self.state.lock().taken
    }

    /// Check if no further job will ever be handed out
    pub fn is_exhausted(&self) -> bool {
        let state = self.state.lock();
        state.cancelled || state.is_exhausted(self.total)
    }

    /// Check if the queue was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn jobs(count: usize) -> Vec<FileJob> {
        (0..count).map(|i| FileJob::new(format!("/corpus/{}.txt", i))).collect()
    }

    #[test]
    fn test_queue_basic() {
        let queue = JobQueue::from_jobs(jobs(2));
        assert_eq!(queue.total(), 2);
        assert_eq!(queue.remaining(), 2);

        let first = queue.take().unwrap();
        assert_eq!(first.path(), Path::new("/corpus/0.txt"));
        assert_eq!(queue.remaining() + queue.taken(), queue.total());

        queue.take().unwrap();
        assert!(queue.is_exhausted());
        assert!(queue.take().is_none());
    }

    #[test]
    fn test_empty_queue_is_exhausted() {
        let queue = JobQueue::from_jobs(Vec::new());
        assert!(queue.is_exhausted());
        assert!(queue.take().is_none());
    }

    #[test]
    fn test_overfill_rejected() {
        let queue = JobQueue::with_total(1);
        queue.enqueue(FileJob::new("/a")).unwrap();
        assert_eq!(
            queue.enqueue(FileJob::new("/b")),
            Err(QueueError::Overfilled { total: 1 })
        );
    }

    #[test]
    fn test_enqueue_after_close_rejected() {
        let queue = JobQueue::with_total(3);
        queue.close();
        assert_eq!(queue.enqueue(FileJob::new("/a")), Err(QueueError::Closed));
    }

    #[test]
    fn test_close_releases_short_queue() {
        let queue = Arc::new(JobQueue::with_total(5));
        queue.enqueue(FileJob::new("/only")).unwrap();

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut seen = 0;
                while queue.take().is_some() {
                    seen += 1;
                }
                seen
            })
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();
        assert_eq!(consumer.join().unwrap(), 1);
    }

    #[test]
    fn test_cancel_wakes_waiters() {
        let queue = Arc::new(JobQueue::with_total(10));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.take())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.cancel();

        for waiter in waiters {
            assert!(waiter.join().unwrap().is_none());
        }
        assert!(queue.is_cancelled());
        assert!(queue.is_exhausted());
    }

    #[test]
    fn test_overlapping_population_and_draining() {
        let total = 500;
        let queue = Arc::new(JobQueue::with_total(total));

        let consumers: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut taken = Vec::new();
                    while let Some(job) = queue.take() {
                        taken.push(job.into_path());
                    }
                    taken
                })
            })
            .collect();

        for (i, job) in jobs(total).into_iter().enumerate() {
            queue.enqueue(job).unwrap();
            if i % 50 == 0 {
                thread::sleep(Duration::from_millis(1));
            }
        }

        let mut seen = HashSet::new();
        let mut count = 0;
        for consumer in consumers {
            for path in consumer.join().unwrap() {
                assert!(seen.insert(path), "job handed out twice");
                count += 1;
            }
        }

        assert_eq!(count, total);
        assert_eq!(queue.taken(), total);
        assert_eq!(queue.remaining(), 0);
    }
}
