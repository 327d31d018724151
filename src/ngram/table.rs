//! Shared n-gram frequency table
//!
//! Counts live in a sharded concurrent map of atomic counters. Incrementing
//! an n-gram that is already present only takes a shard read lock and does an
//! atomic add; the shard write lock is taken only to insert a new key. No
//! increment is ever lost, whatever the number of concurrent writers.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent n-gram -> count table
#[derive(Debug, Default)]
pub struct FrequencyTable {
    counts: DashMap<String, AtomicU64>,
}

impl FrequencyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`
    pub fn increment(&self, key: &str) {
        self.add(key, 1);
    }

    /// Add `amount` occurrences of `key`
    pub fn add(&self, key: &str, amount: u64) {
        if let Some(counter) = self.counts.get(key) {
            counter.fetch_add(amount, Ordering::Relaxed);
            return;
        }

        // Another worker may insert the key between the lookup and here;
        // entry() resolves that under the shard lock.
        self.counts
            .entry(key.to_owned())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(amount, Ordering::Relaxed);
    }

    /// Record every n-gram produced from one file, returning how many there were
    pub fn record_all<'a, I>(&self, ngrams: I) -> u64
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut recorded = 0u64;
        for gram in ngrams {
            self.increment(gram);
            recorded += 1;
        }
        recorded
    }

    /// Current count for `key` (0 if never seen)
    pub fn get(&self, key: &str) -> u64 {
        self.counts
            .get(key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Number of distinct n-grams
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if no n-gram has been recorded
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Copy the counts out of the table
    ///
    /// Only meaningful once every writer has finished.
    pub fn snapshot(&self) -> FrequencySnapshot {
        let counts = self
            .counts
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect();
        FrequencySnapshot { counts }
    }

    /// Consume the table, moving the counts out without cloning keys
    pub fn into_snapshot(self) -> FrequencySnapshot {
        let counts = self
            .counts
            .into_iter()
            .map(|(key, count)| (key, count.into_inner()))
            .collect();
        FrequencySnapshot { counts }
    }
}

/// Final, immutable n-gram counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencySnapshot {
    counts: HashMap<String, u64>,
}

impl FrequencySnapshot {
    /// Count for `key` (0 if absent)
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct n-grams
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if the snapshot holds no n-grams
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterate over (n-gram, count) pairs in map order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries sorted by descending count, ties by ascending n-gram
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &HashMap<String, u64> {
        &self.counts
    }
}

impl From<HashMap<String, u64>> for FrequencySnapshot {
    fn from(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_increment_and_get() {
        let table = FrequencyTable::new();
        assert!(table.is_empty());

        table.increment("ab");
        table.increment("ab");
        table.increment("bc");

        assert_eq!(table.get("ab"), 2);
        assert_eq!(table.get("bc"), 1);
        assert_eq!(table.get("zz"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_record_all() {
        let table = FrequencyTable::new();
        let recorded = table.record_all(["aaa", "aaa", "aab"]);
        assert_eq!(recorded, 3);
        assert_eq!(table.get("aaa"), 2);
    }

    #[test]
    fn test_concurrent_increments_same_key() {
        let table = Arc::new(FrequencyTable::new());
        let threads = 8;
        let per_thread = 10_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        table.increment("hot");
                        table.increment(if i % 2 == 0 { "even" } else { "odd" });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(table.get("hot"), threads * per_thread);
        assert_eq!(table.get("even"), threads * per_thread / 2);
        assert_eq!(table.get("odd"), threads * per_thread / 2);
    }

    #[test]
    fn test_snapshot_sorting() {
        let table = FrequencyTable::new();
        table.add("b", 3);
        table.add("a", 3);
        table.add("c", 7);
        table.add("d", 1);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.total(), 14);
        assert_eq!(
            snapshot.sorted_by_count(),
            vec![("c", 7), ("a", 3), ("b", 3), ("d", 1)]
        );
        assert_eq!(snapshot, table.into_snapshot());
    }
}
