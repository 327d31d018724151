//! Progress reporting for the extraction run
//!
//! Provides a progress bar driven by polling the completion counter, plus
//! the header and summary printed around a run.

use crate::engine::{CompletionCounter, ExtractResult};
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

/// How often the counter is polled
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Progress reporter that tracks finished files
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,

    /// Stop signal
    stop: Arc<AtomicBool>,

    /// Poller thread
    poller: Option<JoinHandle<()>>,
}

impl ProgressReporter {
    /// Start a bar that follows `completion` until finished
    pub fn track(completion: Arc<CompletionCounter>) -> Self {
        let bar = ProgressBar::new(completion.total());

        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:50.green/dim}] {percent:>3}% - {pos}/{len} files - elapsed time: {elapsed_precise} {msg}")
                .expect("Invalid progress template")
                .progress_chars("=>."),
        );

        let stop = Arc::new(AtomicBool::new(false));
        let poller = {
            let bar = bar.clone();
            let stop = Arc::clone(&stop);
            let spawned = thread::Builder::new()
                .name("progress".into())
                .spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        bar.set_position(completion.completed());
                        if completion.is_complete() {
                            break;
                        }
                        thread::sleep(POLL_INTERVAL);
                    }
                    bar.set_position(completion.completed());
                });
            match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    warn!(error = %e, "Failed to start progress thread");
                    None
                }
            }
        };

        Self { bar, stop, poller }
    }

    /// Stop polling and finish the bar with a final message
    pub fn finish(mut self, message: &str) {
        self.stop_poller();
        self.bar.finish_with_message(message.to_string());
    }

    /// Stop polling and clear the bar
    pub fn finish_and_clear(mut self) {
        self.stop_poller();
        self.bar.finish_and_clear();
    }

    fn stop_poller(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(poller) = self.poller.take() {
            let _ = poller.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.stop_poller();
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of the run
pub fn print_summary(result: &ExtractResult, output: Option<&Path>) {
    let duration_secs = result.duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        result.files_done as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    if result.completed {
        println!("{}", style("Extraction Complete").green().bold());
    } else {
        println!("{}", style("Extraction Interrupted").yellow().bold());
    }
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}/{}",
        style("Files:").bold(),
        format_number(result.files_done),
        format_number(result.files_total)
    );
    println!("  {} {}", style("Read:").bold(), format_size(result.totals.bytes, BINARY));
    println!("  {} {}", style("N-grams:").bold(), format_number(result.totals.ngrams));
    println!(
        "  {} {}",
        style("Distinct:").bold(),
        format_number(result.snapshot.len() as u64)
    );
    println!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if result.totals.empty > 0 {
        println!(
            "  {} {}",
            style("Empty:").yellow().bold(),
            format_number(result.totals.empty)
        );
    }
    if result.totals.unreadable > 0 {
        println!(
            "  {} {}",
            style("Unreadable:").yellow().bold(),
            format_number(result.totals.unreadable)
        );
    }
    if let Some(path) = output {
        println!("  {} {}", style("Output:").bold(), path.display());
    }
    println!();
}

/// Print a header at the start of the run
pub fn print_header(root: &str, files: usize, n: usize, workers: usize, output: &str) {
    println!();
    println!(
        "{} {}",
        style("ngram-counter").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source:").bold(), root);
    println!("  {} {}", style("Files:").bold(), format_number(files as u64));
    println!("  {} {}", style("N:").bold(), n);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!("  {} {}", style("Output:").bold(), output);
    println!();
}
