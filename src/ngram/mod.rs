//! N-gram text processing
//!
//! The pure and shared pieces of the pipeline each worker runs per file:
//!
//! ```text
//!   raw text ──► FilterConfig::filter ──► ngrams() ──► FrequencyTable
//!               (allow-list, order kept)  (sliding     (concurrent
//!                                          window)      atomic counts)
//! ```

pub mod extract;
pub mod filter;
pub mod table;

pub use extract::{ngrams, window_count, Ngrams};
pub use filter::FilterConfig;
pub use table::{FrequencySnapshot, FrequencyTable};
