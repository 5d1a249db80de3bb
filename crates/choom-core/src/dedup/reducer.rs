//! Group-by-key accumulation with "most parameters wins" selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::key::NormalizedKey;
use super::parse::ParsedUrl;

/// Counters collected while reducing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceStats {
    /// Non-blank lines offered to the reducer.
    pub lines: usize,
    /// Blank or whitespace-only lines skipped.
    pub blank: usize,
    /// Lines that were not URLs and passed through as their own group.
    pub malformed: usize,
    /// Distinct groups (= output lines).
    pub groups: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    key: NormalizedKey,
    url: String,
    param_count: usize,
}

/// Accumulates URL lines into groups, keeping one representative per group.
///
/// Output order is the order in which each group was first seen.
#[derive(Debug, Default)]
pub struct Reducer {
    index: HashMap<NormalizedKey, usize>,
    entries: Vec<Entry>,
    stats: ReduceStats,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers one raw input line. Surrounding whitespace is stripped; blank
    /// lines are skipped; non-URL lines become their own singleton group.
    pub fn insert(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            self.stats.blank += 1;
            return;
        }
        self.stats.lines += 1;

        let (key, param_count) = match ParsedUrl::parse(line) {
            Ok(parsed) => (parsed.normalized_key(), parsed.param_count()),
            Err(e) => {
                tracing::debug!(line = %line, "passing through non-URL line: {}", e);
                self.stats.malformed += 1;
                (NormalizedKey::opaque(line), 0)
            }
        };

        self.offer(Entry {
            key,
            url: line.to_string(),
            param_count,
        });
    }

    /// Folds another reduction into this one with the same selection rule.
    ///
    /// On equal parameter counts the entry already held by `self` is kept, so
    /// merging shards in input order gives the same result as reducing the
    /// concatenated input.
    pub fn merge(&mut self, other: Reducer) {
        self.stats.lines += other.stats.lines;
        self.stats.blank += other.stats.blank;
        self.stats.malformed += other.stats.malformed;
        for entry in other.entries {
            self.offer(entry);
        }
    }

    fn offer(&mut self, candidate: Entry) {
        match self.index.get(&candidate.key) {
            Some(&pos) => {
                let held = &mut self.entries[pos];
                if candidate.param_count > held.param_count {
                    held.url = candidate.url;
                    held.param_count = candidate.param_count;
                }
            }
            None => {
                self.index.insert(candidate.key.clone(), self.entries.len());
                self.entries.push(candidate);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> ReduceStats {
        ReduceStats {
            groups: self.entries.len(),
            ..self.stats
        }
    }

    /// Current representatives in first-seen group order.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.url.as_str())
    }

    /// `(key, representative)` pairs in first-seen group order.
    pub fn groups(&self) -> impl Iterator<Item = (&NormalizedKey, &str)> {
        self.entries.iter().map(|e| (&e.key, e.url.as_str()))
    }

    pub fn into_urls(self) -> Vec<String> {
        self.entries.into_iter().map(|e| e.url).collect()
    }
}

impl<S: AsRef<str>> Extend<S> for Reducer {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for line in iter {
            self.insert(line.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Reducer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter().fold(Reducer::new(), |mut reducer, line| {
            reducer.insert(line.as_ref());
            reducer
        })
    }
}
