use core::fmt;
use core::iter::FusedIterator;
use core::sync::atomic::{AtomicU64, Ordering};

use crate::raw::{InOrder, RawCountTree};

mod capacity;
mod found;

pub use found::Found;

/// An ordered multiset of sequences, counting how often each one was added.
///
/// Keys are slices of any [`Ord`] + [`Copy`] element type and are ordered by
/// [`compare_sequences`](crate::compare_sequences): element by element, a
/// strict prefix sorting before its extensions. `add` copies a key into the
/// tree the first time it is seen and only bumps a counter afterwards, so a
/// caller can keep refilling one scratch buffer and hand it over again and
/// again.
///
/// The tree is an AVL tree whose nodes live in an arena and whose keys live in
/// a single contiguous pool: a new distinct key costs no allocation of its
/// own, and nothing is ever removed (use [`clear`](CountTree::clear) to start
/// over).
///
/// # Examples
///
/// ```
/// use ngram_counter::CountTree;
///
/// let mut tree = CountTree::new();
/// for word in ["the", "cat", "the", "hat", "the"] {
///     tree.add(word.as_bytes());
/// }
///
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.get(b"the"), Some(3));
///
/// let sorted: Vec<(&[u8], u64)> = tree.iter().collect();
/// assert_eq!(sorted, vec![(&b"cat"[..], 1), (&b"hat"[..], 1), (&b"the"[..], 3)]);
/// ```
///
/// ## Search, then update
///
/// [`search`](CountTree::search) hands out a [`Found`] token that lets the
/// caller change the found node's count without descending again. A token
/// goes stale as soon as the tree is modified by any other means:
///
/// ```
/// use ngram_counter::CountTree;
///
/// let mut tree = CountTree::new();
/// tree.add(&['a', 'b']);
///
/// let found = tree.search(&['a', 'b']).unwrap();
/// assert_eq!(found.count(), 1);
/// assert!(tree.increment_found(found));
/// assert_eq!(tree.get(&['a', 'b']), Some(2));
///
/// let stale = tree.search(&['a', 'b']).unwrap();
/// tree.add(&['c', 'd']);
/// assert!(!tree.update_found(stale, 100));
/// assert_eq!(tree.get(&['a', 'b']), Some(2));
/// ```
pub struct CountTree<T> {
    raw: RawCountTree<T>,
    // Unique per tree, clones included; `Found` tokens only work on the tree
    // that issued them.
    id: u64,
    // Bumped by every mutation; `Found` tokens remember the value they saw.
    generation: u64,
}

fn next_tree_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(0);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A key together with the number of times it was added.
///
/// Produced by [`CountTree::count_entries`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CountEntry<T> {
    /// An owned copy of the key.
    pub key: Vec<T>,
    /// How often the key was added.
    pub count: u64,
}

/// An iterator over the keys and counts of a [`CountTree`], in key order.
///
/// This `struct` is created by the [`iter`](CountTree::iter) method.
pub struct Iter<'a, T> {
    inner: InOrder<'a, T>,
}

impl<T> CountTree<T> {
    /// Makes a new, empty `CountTree`.
    ///
    /// Does not allocate any node storage.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let tree: CountTree<char> = CountTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: RawCountTree::new(),
            id: next_tree_id(),
            generation: 0,
        }
    }

    /// Returns the number of distinct keys in the tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if nothing was added yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of [`add`](CountTree::add) calls since the tree was
    /// created or cleared.
    ///
    /// Counts changed through [`update_found`](CountTree::update_found) are
    /// not reflected here.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.raw.total()
    }

    /// Returns the height of the tree: `-1` when empty, `0` for a single key.
    ///
    /// The tree is kept AVL-balanced, so this never exceeds roughly
    /// `1.44 * log2(len + 2)`.
    #[must_use]
    pub fn height(&self) -> i8 {
        self.raw.height()
    }

    /// Removes every key.
    ///
    /// Invalidates all outstanding [`Found`] tokens.
    ///
    /// # Complexity
    ///
    /// O(1) plus dropping the keys.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.bump_generation();
    }

    /// Gets an iterator over the keys and their counts, in ascending key
    /// order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let mut tree = CountTree::new();
    /// tree.add(&[3, 1]);
    /// tree.add(&[1, 3]);
    /// tree.add(&[1]);
    ///
    /// let keys: Vec<&[i32]> = tree.iter().map(|(key, _)| key).collect();
    /// assert_eq!(keys, vec![&[1][..], &[1, 3][..], &[3, 1][..]]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.raw.iter() }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<T: Ord + Copy> CountTree<T> {
    /// Counts one occurrence of `key`.
    ///
    /// A key seen for the first time is copied into the tree with a count of
    /// one; afterwards only its count grows. Returns `true` if the key was new.
    ///
    /// Invalidates all outstanding [`Found`] tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let mut tree = CountTree::new();
    /// assert!(tree.add("ab".as_bytes()));
    /// assert!(!tree.add("ab".as_bytes()));
    /// assert_eq!(tree.get(b"ab"), Some(2));
    /// assert_eq!(tree.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) comparisons, each O(key length).
    pub fn add(&mut self, key: &[T]) -> bool {
        let (_, created) = self.raw.add(key);
        self.bump_generation();
        created
    }

    /// Returns how often `key` was added, or `None` if it never was.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, key: &[T]) -> Option<u64> {
        self.raw.search(key).map(|handle| self.raw.node(handle).count())
    }

    /// Returns `true` if `key` was added at least once.
    #[must_use]
    pub fn contains_key(&self, key: &[T]) -> bool {
        self.raw.search(key).is_some()
    }

    /// Returns a sorted snapshot of every key.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn keys(&self) -> Vec<Vec<T>> {
        self.iter().map(|(key, _)| key.to_vec()).collect()
    }

    /// Returns a sorted snapshot of every key with its count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::{CountEntry, CountTree};
    ///
    /// let mut tree = CountTree::new();
    /// tree.add(&['b']);
    /// tree.add(&['a']);
    /// tree.add(&['b']);
    ///
    /// assert_eq!(
    ///     tree.count_entries(),
    ///     [CountEntry { key: vec!['a'], count: 1 }, CountEntry { key: vec!['b'], count: 2 }]
    /// );
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn count_entries(&self) -> Vec<CountEntry<T>> {
        self.iter()
            .map(|(key, count)| CountEntry {
                key: key.to_vec(),
                count,
            })
            .collect()
    }
}

impl<T> Default for CountTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for CountTree<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            id: next_tree_id(),
            generation: self.generation,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CountTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a [T]> for CountTree<T> {
    fn extend<I: IntoIterator<Item = &'a [T]>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl<'a, T: Ord + Copy + 'a> FromIterator<&'a [T]> for CountTree<T> {
    fn from_iter<I: IntoIterator<Item = &'a [T]>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, T> IntoIterator for &'a CountTree<T> {
    type Item = (&'a [T], u64);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a [T], u64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn debug_lists_entries_in_order() {
        let tree: CountTree<u8> = [&b"b"[..], &b"a"[..], &b"b"[..]].into_iter().collect();
        assert_eq!(format!("{tree:?}"), "{[97]: 1, [98]: 2}");
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = CountTree::new();
        tree.add(&['x']);
        let snapshot = tree.clone();
        tree.add(&['x']);
        assert_eq!(snapshot.get(&['x']), Some(1));
        assert_eq!(tree.get(&['x']), Some(2));
    }

    #[test]
    fn total_counts_every_add() {
        let mut tree = CountTree::new();
        tree.extend([&[1u8][..], &[2][..], &[1][..], &[1][..]]);
        assert_eq!(tree.total(), 4);
        assert_eq!(tree.len(), 2);
        tree.clear();
        assert_eq!(tree.total(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
    }

    #[test]
    fn contains_key_distinguishes_prefixes() {
        let mut tree = CountTree::new();
        tree.add(b"abc");
        assert!(tree.contains_key(b"abc"));
        assert!(!tree.contains_key(b"ab"));
        assert!(!tree.contains_key(b"abcd"));
    }

    #[test]
    fn keys_are_snapshots() {
        let mut tree = CountTree::new();
        let mut scratch = vec!['a', 'b'];
        tree.add(&scratch);
        scratch[0] = 'z';
        tree.add(&scratch);
        assert_eq!(tree.keys(), vec![vec!['a', 'b'], vec!['z', 'b']]);
    }
}
