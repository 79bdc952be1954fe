//! Attribute frequency statistics
//!
//! Counts attribute paths, path depths and predicate types, and keeps the
//! totals the report computes percentages against.

use std::collections::HashMap;
use std::hash::Hash;

/// Separator whose occurrences define an attribute's depth
pub const PATH_SEPARATOR: char = '/';

/// Depth of an attribute path (number of `/` characters)
pub fn attribute_depth(path: &str) -> usize {
    path.matches(PATH_SEPARATOR).count()
}

/// `count / total * 100`, or 0 when nothing was counted
pub fn percent_of(count: u64, total: u64) -> f64 {
    if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Occurrence counts per key, remembering first-seen order
///
/// First-seen order is what equal counts fall back to in
/// [`FrequencyTable::sorted_by_count`], since the sort is stable.
#[derive(Debug, Clone)]
pub struct FrequencyTable<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u64)>,
}

impl<K> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Hash + Eq + Clone> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `key`
    pub fn increment(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Count `n` occurrences of `key`
    pub fn add(&mut self, key: K, n: u64) {
        match self.index.get(&key) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, n));
            }
        }
    }

    pub fn get(&self, key: &K) -> u64 {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Entries by descending count
    pub fn sorted_by_count(&self) -> Vec<(&K, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Sum of the `k` largest counts
    pub fn top_k_cumulative(&self, k: usize) -> u64 {
        self.sorted_by_count()
            .iter()
            .take(k)
            .map(|(_, count)| count)
            .sum()
    }

    /// Fold another table's counts into this one
    pub fn merge(&mut self, other: &FrequencyTable<K>) {
        for (key, count) in other.iter() {
            self.add(key.clone(), count);
        }
    }
}

impl<K: Hash + Eq + Clone + Ord> FrequencyTable<K> {
    /// Entries by ascending key
    pub fn sorted_by_key(&self) -> Vec<(&K, u64)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted
    }
}

/// Accumulator threaded through session or log analysis
#[derive(Debug, Clone, Default)]
pub struct AttributeStats {
    /// Occurrences per attribute path
    pub attributes: FrequencyTable<String>,
    /// Occurrences per attribute depth
    pub depths: FrequencyTable<usize>,
    /// Occurrences per predicate type (session input only)
    pub types: FrequencyTable<String>,
    /// Leaves seen (sessions) or quoted attributes seen (logs)
    pub total_count: u64,
    /// Queries seen
    pub total_queries: u64,
    /// Log files scanned; `None` for session input
    pub total_files: Option<u64>,
}

impl AttributeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one leaf predicate
    ///
    /// The leaf always counts towards `total_count` and the type table;
    /// only leaves with a path reach the attribute and depth tables.
    pub fn record_leaf(&mut self, kind: &str, path: Option<&str>) {
        self.total_count += 1;
        self.types.increment(kind.to_string());
        if let Some(path) = path {
            self.count_attribute(path);
        }
    }

    /// Record one attribute occurrence found in a log line
    pub fn record_attribute(&mut self, path: &str) {
        self.total_count += 1;
        self.count_attribute(path);
    }

    pub fn record_query(&mut self) {
        self.total_queries += 1;
    }

    pub fn record_file(&mut self) {
        *self.total_files.get_or_insert(0) += 1;
    }

    fn count_attribute(&mut self, path: &str) {
        self.attributes.increment(path.to_string());
        self.depths.increment(attribute_depth(path));
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &AttributeStats) {
        self.attributes.merge(&other.attributes);
        self.depths.merge(&other.depths);
        self.types.merge(&other.types);
        self.total_count += other.total_count;
        self.total_queries += other.total_queries;
        if let Some(files) = other.total_files {
            *self.total_files.get_or_insert(0) += files;
        }
    }
}
