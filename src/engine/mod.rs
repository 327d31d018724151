//! Parallel extraction engine
//!
//! A fixed pool of worker threads drains a counted job queue and merges
//! n-gram counts into one shared table.
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────────────────────┐
//!            │        JobQueue          │
//!            │  - mutex + condvar       │
//!            │  - declared total N      │
//!            └────────────┬─────────────┘
//!                         │ take()
//!       ┌─────────────────┼─────────────────┐
//!       │                 │                 │
//! ┌─────▼─────┐     ┌─────▼─────┐     ┌─────▼─────┐
//! │  Worker 0 │     │  Worker 1 │ ... │  Worker W │
//! │ read file │     │ read file │     │ read file │
//! │ filter    │     │ filter    │     │ filter    │
//! │ window    │     │ window    │     │ window    │
//! └─────┬─────┘     └─────┬─────┘     └─────┬─────┘
//!       └─────────────────┼─────────────────┘
//!                         ▼
//!       FrequencyTable (atomic counts) + CompletionCounter
//! ```
//!
//! Workers leave their loop only when the queue reports exhaustion, which
//! happens when all N jobs have been taken. The coordinator joins all of
//! them before the table is read.

pub mod coordinator;
pub mod queue;
pub mod worker;

pub use coordinator::{
    ExtractCoordinator, ExtractResult, ShutdownHandle, DEFAULT_WORKERS, MAX_WORKERS,
};
pub use queue::{FileJob, JobQueue};
pub use worker::{process_job, CompletionCounter, JobTotals, WorkerStats};
