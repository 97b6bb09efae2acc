use core::fmt;

use super::CountTree;
use crate::raw::Handle;

/// A reference to a node returned by [`CountTree::search`].
///
/// Passing it back to [`CountTree::update_found`] or
/// [`CountTree::increment_found`] changes that node's count in O(1). The
/// token is consumed by the update and is only honoured by the tree that
/// issued it, and only if that tree was not modified in between; otherwise
/// the update is refused. Clones of a tree count as different trees.
#[must_use = "a `Found` token does nothing unless passed back to the tree"]
pub struct Found {
    handle: Handle,
    count: u64,
    tree: u64,
    generation: u64,
}

impl Found {
    /// The key's count at the time of the search.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl fmt::Debug for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Found").field("count", &self.count).finish_non_exhaustive()
    }
}

impl<T: Ord + Copy> CountTree<T> {
    /// Looks `key` up and returns a token for its node, or `None` if the key
    /// was never added.
    ///
    /// The search never restructures the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let mut tree = CountTree::new();
    /// tree.add(b"xyz");
    ///
    /// assert_eq!(tree.search(b"xyz").map(|found| found.count()), Some(1));
    /// assert!(tree.search(b"xy").is_none());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn search(&self, key: &[T]) -> Option<Found> {
        let handle = self.raw.search(key)?;
        Some(Found {
            handle,
            count: self.raw.node(handle).count(),
            tree: self.id(),
            generation: self.generation,
        })
    }
}

impl<T> CountTree<T> {
    /// Sets the count of the node `found` refers to.
    ///
    /// Returns `false`, leaving the tree untouched, if `found` came from
    /// another tree or the tree changed since `found` was produced. Counts of zero are allowed; the key stays in the
    /// tree.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn update_found(&mut self, found: Found, new_count: u64) -> bool {
        if found.tree != self.id() || found.generation != self.generation {
            return false;
        }

        self.raw.node_mut(found.handle).set_count(new_count);
        self.bump_generation();
        true
    }

    /// Adds one to the count of the node `found` refers to.
    ///
    /// Unlike [`add`](CountTree::add), this does not change
    /// [`total`](CountTree::total). Returns `false` if `found` is stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let mut tree = CountTree::new();
    /// let key = ['n', 'g'];
    ///
    /// match tree.search(&key) {
    ///     Some(found) => assert!(tree.increment_found(found)),
    ///     None => assert!(tree.add(&key)),
    /// }
    /// assert_eq!(tree.get(&key), Some(1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn increment_found(&mut self, found: Found) -> bool {
        let count = found.count.saturating_add(1);
        self.update_found(found, count)
    }
}
