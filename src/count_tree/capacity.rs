use super::{CountTree, next_tree_id};
use crate::raw::RawCountTree;

impl<T> CountTree<T> {
    /// Creates an empty tree with room for at least `capacity` distinct keys
    /// of `key_len` elements each before it has to reallocate.
    ///
    /// An extractor knows its window size up front, which makes `key_len`
    /// exact for every key it will ever add.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngram_counter::CountTree;
    ///
    /// let tree: CountTree<char> = CountTree::with_capacity(256, 3);
    /// assert!(tree.is_empty());
    /// assert!(tree.capacity() >= 256);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize, key_len: usize) -> Self {
        CountTree {
            raw: RawCountTree::with_capacity(capacity, key_len),
            id: next_tree_id(),
            generation: 0,
        }
    }

    /// Returns how many distinct keys fit before the node storage grows.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
