//! Integration tests for ngram-counter
//!
//! These tests build small corpora in temporary folders and run the full
//! enumerate → extract → write pipeline.

use ngram_counter::engine::{ExtractCoordinator, FileJob, JobQueue};
use ngram_counter::enumerate::enumerate_jobs;
use ngram_counter::ngram::{ngrams, FilterConfig, FrequencySnapshot};
use ngram_counter::output::{write_table_file, OutputOptions};
use std::collections::HashMap;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use tempfile::tempdir;

fn filter(allow: &str, n: usize) -> FilterConfig {
    FilterConfig::new(allow, NonZeroUsize::new(n).unwrap())
}

fn run(jobs: Vec<FileJob>, filter: FilterConfig, workers: usize) -> FrequencySnapshot {
    let coordinator = ExtractCoordinator::new(filter, workers, JobQueue::from_jobs(jobs)).unwrap();
    let result = coordinator.run().unwrap();
    assert!(result.completed);
    assert_eq!(result.files_done, result.files_total);
    result.snapshot
}

/// Count n-grams of `texts` on a single thread, straight from the definition
fn expected_counts(texts: &[String], filter: &FilterConfig) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for text in texts {
        let filtered = filter.filter(text);
        for gram in ngrams(&filtered, filter.n()) {
            *counts.entry(gram.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn write_corpus(root: &Path, count: usize) -> Vec<String> {
    let words = ["lorem", "ipsum", "dolor", "sit", "amet", "ça", "naïve", "über", "aaaa", "\n"];
    let mut texts = Vec::new();
    for i in 0..count {
        let text: String = (0..(i % 17) * 7)
            .map(|j| words[(i * 31 + j * 7) % words.len()])
            .collect::<Vec<_>>()
            .join(" ");
        let path = root.join(format!("dir{}/file{}.txt", i % 5, i));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, &text).unwrap();
        texts.push(text);
    }
    texts
}

#[test]
fn test_worker_count_does_not_change_counts() {
    let dir = tempdir().unwrap();
    let texts = write_corpus(dir.path(), 120);
    let config = filter("", 3);

    let jobs = enumerate_jobs(dir.path(), &[], "txt").unwrap();
    assert_eq!(jobs.len(), 120);

    let single = run(jobs.clone(), config.clone(), 1);
    let parallel = run(jobs, config.clone(), 8);

    assert_eq!(single, parallel);
    assert_eq!(single.as_map(), &expected_counts(&texts, &config));
}

#[test]
fn test_filtered_counts_match_definition() {
    let dir = tempdir().unwrap();
    let texts = write_corpus(dir.path(), 40);
    let config = filter("aeiouç ", 2);

    let jobs = enumerate_jobs(dir.path(), &[], "txt").unwrap();
    let snapshot = run(jobs, config.clone(), 4);

    assert_eq!(snapshot.as_map(), &expected_counts(&texts, &config));
}

#[test]
fn test_examples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.txt");

    fs::write(&path, "xaybzc").unwrap();
    let snapshot = run(vec![FileJob::new(&path)], filter("abc", 2), 1);
    assert_eq!(snapshot.get("ab"), 1);
    assert_eq!(snapshot.get("bc"), 1);
    assert_eq!(snapshot.len(), 2);

    fs::write(&path, "aaaa").unwrap();
    let snapshot = run(vec![FileJob::new(&path)], filter("", 3), 1);
    assert_eq!(snapshot.get("aaa"), 2);
    assert_eq!(snapshot.len(), 1);

    fs::write(&path, "ab").unwrap();
    let snapshot = run(vec![FileJob::new(&path)], filter("", 5), 1);
    assert!(snapshot.is_empty());
}

#[test]
fn test_mixed_outcomes_complete_the_run() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.txt");
    let empty = dir.path().join("empty.txt");
    let folder = dir.path().join("folder.txt");
    fs::write(&good, "abcabc").unwrap();
    fs::write(&empty, "").unwrap();
    fs::create_dir(&folder).unwrap();

    let jobs = vec![
        FileJob::new(&good),
        FileJob::new(&empty),
        FileJob::new(&folder),
        FileJob::new(dir.path().join("missing.txt")),
    ];

    let coordinator =
        ExtractCoordinator::new(filter("", 3), 2, JobQueue::from_jobs(jobs)).unwrap();
    let completion = coordinator.completion();
    let result = coordinator.run().unwrap();

    assert!(result.completed);
    assert_eq!(completion.completed(), 4);
    assert_eq!(result.totals.counted, 1);
    assert_eq!(result.totals.empty, 1);
    assert_eq!(result.totals.unreadable, 2);
    assert_eq!(result.snapshot.get("abc"), 2);
    assert_eq!(result.snapshot.get("bca"), 1);
    assert_eq!(result.snapshot.get("cab"), 1);
}

#[test]
fn test_population_overlapping_run() {
    let dir = tempdir().unwrap();
    let total = 60;
    let mut paths = Vec::new();
    for i in 0..total {
        let path = dir.path().join(format!("{}.txt", i));
        fs::write(&path, "aaa").unwrap();
        paths.push(path);
    }

    let coordinator =
        ExtractCoordinator::new(filter("", 3), 4, JobQueue::with_total(total)).unwrap();
    let queue = coordinator.queue();

    let producer = thread::spawn(move || {
        for path in paths {
            queue.enqueue(FileJob::new(path)).unwrap();
            thread::yield_now();
        }
    });

    let result = coordinator.run().unwrap();
    producer.join().unwrap();

    assert!(result.completed);
    assert_eq!(result.files_done, total as u64);
    assert_eq!(result.snapshot.get("aaa"), total as u64);
}

#[test]
fn test_end_to_end_output_file() {
    let dir = tempdir().unwrap();
    let corpus = dir.path().join("corpus");
    fs::create_dir_all(corpus.join("skip")).unwrap();
    fs::write(corpus.join("a.txt"), "abab").unwrap();
    fs::write(corpus.join("b.txt"), "ab").unwrap();
    fs::write(corpus.join("c.md"), "zzzz").unwrap();
    fs::write(corpus.join("skip/d.txt"), "zzzz").unwrap();

    let jobs = enumerate_jobs(&corpus, &[corpus.join("skip")], "txt").unwrap();
    assert_eq!(jobs.len(), 2);

    let snapshot = run(jobs, filter("", 2), 2);
    let output = dir.path().join("ngrams.csv");
    let rows = write_table_file(&output, &snapshot, OutputOptions::default()).unwrap();

    assert_eq!(rows, 2);
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "n-gram\tcount\nab\t3\nba\t1\n");
}
