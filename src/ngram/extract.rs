//! Sliding-window n-gram extraction
//!
//! The window moves one character at a time over the filtered text and every
//! position yields one n-gram, so repeated n-grams are emitted once per
//! occurrence. Windows are measured in characters, not bytes, and the
//! emitted slices borrow from the input.

use std::num::NonZeroUsize;
use std::str::CharIndices;

/// Number of windows of width `n` over `len` characters
///
/// This is `max(0, len - n + 1)`; a text shorter than the window yields zero.
pub fn window_count(len: usize, n: NonZeroUsize) -> usize {
    match len.checked_sub(n.get()) {
        Some(slack) => slack + 1,
        None => 0,
    }
}

/// Iterator over the n-grams of a text
///
/// Two cursors walk the char boundaries `n` characters apart.
#[derive(Debug, Clone)]
pub struct Ngrams<'a> {
    text: &'a str,

    /// Boundary where the next window starts
    starts: CharIndices<'a>,

    /// Boundary where the next window ends; exhausted means `text.len()`
    ends: CharIndices<'a>,

    remaining: usize,
}

impl<'a> Ngrams<'a> {
    /// Create an extractor over `text` with window width `n`
    pub fn new(text: &'a str, n: NonZeroUsize) -> Self {
        let remaining = window_count(text.chars().count(), n);

        let mut ends = text.char_indices();
        if remaining > 0 {
            ends.nth(n.get() - 1);
        }

        Self {
            text,
            starts: text.char_indices(),
            ends,
            remaining,
        }
    }
}

impl<'a> Iterator for Ngrams<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let (start, _) = self.starts.next()?;
        let stop = self.ends.next().map_or(self.text.len(), |(i, _)| i);
        self.remaining -= 1;
        Some(&self.text[start..stop])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Ngrams<'_> {}

/// Extract the n-grams of `text`
pub fn ngrams(text: &str, n: NonZeroUsize) -> Ngrams<'_> {
    Ngrams::new(text, n)
}
