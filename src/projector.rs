//! Rendering a count tree into printable n-gram counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::count_tree::CountTree;
use crate::symbol::Symbol;

/// The counts of one scan, keyed by the rendered n-gram.
///
/// `total` is the number of windows counted, so the counts always sum to it.
///
/// # Examples
///
/// ```
/// use ngram_counter::{CountTree, NgramCounts};
///
/// let mut tree = CountTree::new();
/// tree.add(&['o', 'k']);
/// tree.add(&['h', 'i']);
/// tree.add(&['o', 'k']);
///
/// let counts = NgramCounts::from_tree(&tree);
/// assert_eq!(counts.total(), 3);
/// assert_eq!(counts.ranked(), vec![("ok", 2), ("hi", 1)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramCounts {
    counts: BTreeMap<String, u64>,
    total: u64,
}

impl NgramCounts {
    /// Renders every key of `tree` once.
    #[must_use]
    pub fn from_tree<T: Symbol>(tree: &CountTree<T>) -> Self {
        let mut counts = BTreeMap::new();
        let mut rendered = String::new();
        for (key, count) in tree {
            rendered.clear();
            T::render(key, &mut rendered);
            *counts.entry(rendered.clone()).or_insert(0) += count;
        }

        Self {
            counts,
            total: tree.total(),
        }
    }

    /// Counts keyed by n-gram, in key order.
    #[must_use]
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    #[must_use]
    pub fn into_counts(self) -> BTreeMap<String, u64> {
        self.counts
    }

    /// Number of windows counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct n-grams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn get(&self, ngram: &str) -> Option<u64> {
        self.counts.get(ngram).copied()
    }

    /// Most frequent first; ties in key order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<_> = self.counts.iter().map(|(ngram, &count)| (ngram.as_str(), count)).collect();
        // The map is already in key order and the sort is stable.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Share of `count` in the total, in percent. Zero when nothing was
    /// counted.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share(&self, count: u64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        count as f64 * 100.0 / self.total as f64
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_projects_to_nothing() {
        let counts = NgramCounts::from_tree(&CountTree::<char>::new());
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
        assert!(counts.share(0).abs() < f64::EPSILON);
    }

    #[test]
    fn bytes_render_as_hex() {
        let mut tree = CountTree::new();
        tree.add(&[0x0a_u8]);
        tree.add(&[0xc3]);
        tree.add(&[0x0a]);
        let counts = NgramCounts::from_tree(&tree);
        assert_eq!(counts.get("0A"), Some(2));
        assert_eq!(counts.get("C3"), Some(1));
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn ranked_breaks_ties_by_key() {
        let mut tree = CountTree::new();
        for key in ["b", "a", "c", "c"] {
            let key: Vec<char> = key.chars().collect();
            tree.add(&key);
        }
        let counts = NgramCounts::from_tree(&tree);
        assert_eq!(counts.ranked(), vec![("c", 2), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn share_is_a_percentage() {
        let mut tree = CountTree::new();
        tree.extend([&['x'][..], &['y'][..], &['y'][..], &['y'][..]]);
        let counts = NgramCounts::from_tree(&tree);
        assert!((counts.share(3) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn serializes_as_map_and_total() {
        let mut tree = CountTree::new();
        tree.add(&['h', 'i']);
        let json = serde_json::to_string(&NgramCounts::from_tree(&tree)).unwrap();
        assert_eq!(json, r#"{"counts":{"hi":1},"total":1}"#);
    }
}
