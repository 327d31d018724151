//! ngram-counter - Parallel Character N-gram Counter
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use ngram_counter::config::{CliArgs, ExtractConfig};
use ngram_counter::engine::{ExtractCoordinator, JobQueue};
use ngram_counter::enumerate::enumerate_jobs;
use ngram_counter::error::NgramError;
use ngram_counter::output::{write_table_file, OutputOptions};
use ngram_counter::progress::{print_header, print_summary, ProgressReporter};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ExtractConfig::from_args(args).context("Invalid configuration")?;

    // List files to be processed
    let jobs = enumerate_jobs(&config.root, &config.excluded, &config.extension)
        .context("Failed to enumerate corpus")?;

    if config.show_progress {
        print_header(
            &config.root.display().to_string(),
            jobs.len(),
            config.filter.n().get(),
            config.worker_count,
            &config.output_path.display().to_string(),
        );
    }
    info!(files = jobs.len(), "Processing files");

    let coordinator = ExtractCoordinator::new(
        config.filter.clone(),
        config.worker_count,
        JobQueue::from_jobs(jobs),
    )
    .context("Failed to initialize workers")?;

    // Setup signal handler for graceful shutdown
    let shutdown = coordinator.shutdown_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown.cancel();
    })
    .context("Failed to set signal handler")?;

    // Create progress reporter
    let progress = if config.show_progress {
        Some(ProgressReporter::track(coordinator.completion()))
    } else {
        None
    };

    // Run the extraction
    let result = coordinator.run().context("Extraction failed")?;

    // Finish progress
    if let Some(p) = progress {
        if result.completed {
            p.finish("done");
        } else {
            p.finish("interrupted");
        }
    }

    if !result.completed {
        if config.show_progress {
            print_summary(&result, None);
        }
        return Err(NgramError::Interrupted.into());
    }

    result.check_failure_threshold(config.max_failure_percent)?;

    if result.totals.unreadable > 0 {
        warn!(unreadable = result.totals.unreadable, "Some files could not be read");
    }

    // Write n-grams
    let options = OutputOptions {
        delimiter: config.delimiter,
        sort: config.sort_output,
    };
    write_table_file(&config.output_path, &result.snapshot, options)
        .context("Failed to write output")?;

    if config.show_progress {
        print_summary(&result, Some(&config.output_path));
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("ngram_counter=debug,warn")
    } else {
        EnvFilter::new("ngram_counter=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
