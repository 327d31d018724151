//! Allow-list filtering of file content
//!
//! Filtering removes every character that is not in the allow-list while
//! keeping the order of the survivors. The result is treated as contiguous
//! text by the extractor, so n-grams may join characters that were apart in
//! the source file.

use std::borrow::Cow;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// Immutable per-run filter settings: allow-list and window width
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Characters to keep (None = keep everything)
    allowed: Option<HashSet<char>>,

    /// The allow-list as given, for display
    allow_list: String,

    /// Window width
    n: NonZeroUsize,
}

impl FilterConfig {
    /// Create a filter configuration
    ///
    /// An empty `allow_list` keeps every character.
    pub fn new(allow_list: &str, n: NonZeroUsize) -> Self {
        let allowed = if allow_list.is_empty() {
            None
        } else {
            Some(allow_list.chars().collect())
        };

        Self {
            allowed,
            allow_list: allow_list.to_string(),
            n,
        }
    }

    /// Keep-everything filter with the given width
    pub fn allow_all(n: NonZeroUsize) -> Self {
        Self::new("", n)
    }

    /// Window width
    pub fn n(&self) -> NonZeroUsize {
        self.n
    }

    /// The allow-list string (empty when everything is allowed)
    pub fn allow_list(&self) -> &str {
        &self.allow_list
    }

    /// Check whether a single character survives filtering
    pub fn is_allowed(&self, c: char) -> bool {
        match &self.allowed {
            Some(set) => set.contains(&c),
            None => true,
        }
    }

    /// Filter `text`, borrowing it unchanged when nothing would be removed
    pub fn filter<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.allowed {
            None => Cow::Borrowed(text),
            Some(set) => {
                if text.chars().all(|c| set.contains(&c)) {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(text.chars().filter(|c| set.contains(c)).collect())
                }
            }
        }
    }
}
