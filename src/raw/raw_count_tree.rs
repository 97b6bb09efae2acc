use core::cmp::Ordering;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{EMPTY_HEIGHT, Node, Side};
use crate::compare::compare_sequences;

/// Inline capacity of traversal stacks. An AVL tree addressing `u32::MAX`
/// nodes is at most 46 levels deep, so the stacks never spill to the heap.
pub(crate) const MAX_DEPTH: usize = 48;

/// The AVL tree backing `CountTree`.
#[derive(Clone, Debug)]
pub(crate) struct RawCountTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node>,
    /// Every key ever inserted, back to back. Nodes refer into it by range, so
    /// a new distinct key costs no allocation of its own.
    keys: Vec<T>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of `add` calls, new keys and repeats alike.
    total: u64,
}

/// One step of a descent from the root.
struct PathElement {
    /// Handle to the node at this level.
    node: Handle,
    /// Child the descent continued into.
    side: Side,
}

type Path = SmallVec<[PathElement; MAX_DEPTH]>;

impl<T> RawCountTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            keys: Vec::new(),
            root: None,
            total: 0,
        }
    }

    /// Creates an empty tree with room for `capacity` distinct keys of
    /// `key_len` elements each.
    pub(crate) fn with_capacity(capacity: usize, key_len: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            keys: Vec::with_capacity(capacity.saturating_mul(key_len)),
            root: None,
            total: 0,
        }
    }

    /// Returns the number of distinct keys.
    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) const fn total(&self) -> u64 {
        self.total
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Height of the whole tree; `-1` when empty.
    pub(crate) fn height(&self) -> i8 {
        self.height_of(self.root)
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node {
        self.nodes.get_mut(handle)
    }

    /// Returns the key stored at `handle`.
    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &[T] {
        &self.keys[self.nodes.get(handle).key_range()]
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.keys.clear();
        self.root = None;
        self.total = 0;
    }

    /// Walks the tree in key order.
    pub(crate) fn iter(&self) -> InOrder<'_, T> {
        InOrder::new(self)
    }

    #[inline]
    fn height_of(&self, subtree: Option<Handle>) -> i8 {
        subtree.map_or(EMPTY_HEIGHT, |handle| self.nodes.get(handle).height())
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = 1 + self.height_of(node.left()).max(self.height_of(node.right()));
        self.nodes.get_mut(handle).set_height(height);
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance_factor(&self, handle: Handle) -> i8 {
        let node = self.nodes.get(handle);
        self.height_of(node.left()) - self.height_of(node.right())
    }

    /// Rotates `handle` down to the right and returns the new subtree root.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).left().expect("`rotate_right()` - node has no left child!");
        let moved = self.nodes.get(pivot).right();

        self.nodes.get_mut(handle).set_left(moved);
        self.nodes.get_mut(pivot).set_right(Some(handle));

        // Order matters: the demoted node is now the pivot's child.
        self.update_height(handle);
        self.update_height(pivot);

        pivot
    }

    /// Rotates `handle` down to the left and returns the new subtree root.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).right().expect("`rotate_left()` - node has no right child!");
        let moved = self.nodes.get(pivot).left();

        self.nodes.get_mut(handle).set_right(moved);
        self.nodes.get_mut(pivot).set_left(Some(handle));

        self.update_height(handle);
        self.update_height(pivot);

        pivot
    }

    /// Restores the AVL condition at `handle`, whose own height is current.
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        let balance = self.balance_factor(handle);

        if balance > 1 {
            let left = self.nodes.get(handle).left().expect("`rebalance()` - left-heavy node has no left child!");
            if self.balance_factor(left) < 0 {
                // Left-right: straighten the child first.
                let straightened = self.rotate_left(left);
                self.nodes.get_mut(handle).set_left(Some(straightened));
            }
            self.rotate_right(handle)
        } else if balance < -1 {
            let right = self.nodes.get(handle).right().expect("`rebalance()` - right-heavy node has no right child!");
            if self.balance_factor(right) > 0 {
                // Right-left.
                let straightened = self.rotate_right(right);
                self.nodes.get_mut(handle).set_right(Some(straightened));
            }
            self.rotate_left(handle)
        } else {
            handle
        }
    }

    /// Walks back up `path` after a leaf was attached below its last element.
    fn retrace(&mut self, path: &[PathElement]) {
        for depth in (0..path.len()).rev() {
            let handle = path[depth].node;
            let old_height = self.nodes.get(handle).height();

            self.update_height(handle);
            let subtree = self.rebalance(handle);

            if subtree != handle {
                // A rotation after an insertion brings the subtree back to
                // its height before the insertion; nothing above changes.
                self.replace_child(path, depth, subtree);
                return;
            }

            if self.nodes.get(handle).height() == old_height {
                return;
            }
        }
    }

    /// Points whatever referenced `path[depth]` at `subtree` instead.
    fn replace_child(&mut self, path: &[PathElement], depth: usize, subtree: Handle) {
        match depth.checked_sub(1) {
            Some(parent_depth) => {
                let parent = &path[parent_depth];
                self.nodes.get_mut(parent.node).set_child(parent.side, Some(subtree));
            }
            None => self.root = Some(subtree),
        }
    }
}

impl<T: Ord + Copy> RawCountTree<T> {
    /// Finds the node holding `key`.
    pub(crate) fn search(&self, key: &[T]) -> Option<Handle> {
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match compare_sequences(key, &self.keys[node.key_range()]) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }

        None
    }

    /// Counts one occurrence of `key`, inserting a copy of it when it is new.
    ///
    /// Returns the node's handle and whether the node was created.
    pub(crate) fn add(&mut self, key: &[T]) -> (Handle, bool) {
        self.total = self.total.saturating_add(1);

        let mut path: Path = SmallVec::new();
        let mut current = self.root;

        while let Some(handle) = current {
            let ordering = compare_sequences(key, self.key(handle));
            let side = match ordering {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => {
                    self.nodes.get_mut(handle).increment();
                    return (handle, false);
                }
            };
            path.push(PathElement { node: handle, side });
            current = self.nodes.get(handle).child(side);
        }

        let start = self.keys.len();
        let leaf = self.nodes.alloc(Node::new_leaf(start..start + key.len()));
        self.keys.extend_from_slice(key);

        match path.last() {
            Some(parent) => self.nodes.get_mut(parent.node).set_child(parent.side, Some(leaf)),
            None => self.root = Some(leaf),
        }

        self.retrace(&path);

        (leaf, true)
    }
}

/// In-order iterator over `(key, count)` pairs.
///
/// Holds the left spine of the part of the tree not yet visited.
pub(crate) struct InOrder<'a, T> {
    tree: &'a RawCountTree<T>,
    stack: SmallVec<[Handle; MAX_DEPTH]>,
    remaining: usize,
}

impl<'a, T> InOrder<'a, T> {
    fn new(tree: &'a RawCountTree<T>) -> Self {
        let mut iter = Self {
            tree,
            stack: SmallVec::new(),
            remaining: tree.len(),
        };
        iter.push_left_spine(tree.root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<Handle>) {
        while let Some(handle) = current {
            self.stack.push(handle);
            current = self.tree.node(handle).left();
        }
    }
}

impl<'a, T> Iterator for InOrder<'a, T> {
    type Item = (&'a [T], u64);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.stack.pop()?;
        let tree = self.tree;
        let node = tree.node(handle);
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some((tree.key(handle), node.count()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for InOrder<'_, T> {}

impl<T> FusedIterator for InOrder<'_, T> {}

impl<T> Clone for InOrder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    impl<T: Ord + Copy + core::fmt::Debug> RawCountTree<T> {
        /// Validates all AVL invariants. Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut visited = 0usize;

            self.validate_node(self.root, &mut visited, &mut errors);

            if visited != self.len() {
                errors.push(format!("len mismatch: len={}, reachable nodes={}", self.len(), visited));
            }

            let keys: Vec<&[T]> = self.iter().map(|(key, _)| key).collect();
            for pair in keys.windows(2) {
                if compare_sequences(pair[0], pair[1]) != Ordering::Less {
                    errors.push(format!("keys out of order: {:?} then {:?}", pair[0], pair[1]));
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns the real height of the subtree.
        fn validate_node(&self, subtree: Option<Handle>, visited: &mut usize, errors: &mut Vec<String>) -> i8 {
            let Some(handle) = subtree else {
                return EMPTY_HEIGHT;
            };
            *visited += 1;

            let node = self.nodes.get(handle);
            let left = self.validate_node(node.left(), visited, errors);
            let right = self.validate_node(node.right(), visited, errors);
            let height = 1 + left.max(right);

            if node.height() != height {
                errors.push(format!("stale height at {handle:?}: stored={}, actual={height}", node.height()));
            }
            if (left - right).abs() > 1 {
                errors.push(format!("unbalanced at {handle:?}: left={left}, right={right}"));
            }
            height
        }
    }

    fn add_all(keys: &[&str]) -> RawCountTree<u8> {
        let mut tree: RawCountTree<u8> = RawCountTree::new();
        for key in keys {
            tree.add(key.as_bytes());
        }
        tree.validate_invariants();
        tree
    }

    fn root_key(tree: &RawCountTree<u8>) -> &[u8] {
        tree.key(tree.root().unwrap())
    }

    #[test]
    fn left_left_rotates_once() {
        let tree = add_all(&["c", "b", "a"]);
        assert_eq!(root_key(&tree), b"b");
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn right_right_rotates_once() {
        let tree = add_all(&["a", "b", "c"]);
        assert_eq!(root_key(&tree), b"b");
    }

    #[test]
    fn left_right_rotates_twice() {
        let tree = add_all(&["c", "a", "b"]);
        assert_eq!(root_key(&tree), b"b");
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn right_left_rotates_twice() {
        let tree = add_all(&["a", "c", "b"]);
        assert_eq!(root_key(&tree), b"b");
    }

    #[test]
    fn repeated_key_only_counts() {
        let tree = add_all(&["ab", "ab", "ab"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.total(), 3);
        assert_eq!(tree.node(tree.search(b"ab").unwrap()).count(), 3);
        assert_eq!(tree.height(), 0);
    }

    #[test]
    fn prefixes_are_distinct_keys() {
        let tree = add_all(&["abc", "ab", "a", "", "abcd"]);
        let keys: Vec<&[u8]> = tree.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![&b""[..], &b"a"[..], &b"ab"[..], &b"abc"[..], &b"abcd"[..]]);
    }

    #[test]
    fn empty_tree() {
        let tree: RawCountTree<char> = RawCountTree::new();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), EMPTY_HEIGHT);
        assert_eq!(tree.search(&['x']), None);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn ascending_insertions_stay_logarithmic() {
        let mut tree: RawCountTree<u8> = RawCountTree::new();
        for i in 0u32..4096 {
            tree.add(&i.to_be_bytes());
        }
        tree.validate_invariants();
        // A perfectly balanced tree of 4096 nodes has height 12.
        assert!(tree.height() <= 13, "height {} too large", tree.height());
    }

    #[test]
    fn key_pool_holds_each_distinct_key_once() {
        let mut tree = RawCountTree::with_capacity(4, 3);
        for key in ["abc", "abd", "abc", "abc"] {
            tree.add(key.as_bytes());
        }
        assert_eq!(tree.keys.len(), 6);
        assert!(tree.capacity() >= 4);
    }

    #[test]
    fn clear_resets_everything() {
        let mut tree = add_all(&["x", "y", "z"]);
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.total(), 0);
        assert_eq!(tree.root(), None);
        tree.add(b"q");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    #[should_panic(expected = "arena is at maximum capacity")]
    fn one_node_per_key_up_to_handle_max() {
        let mut tree: RawCountTree<u8> = RawCountTree::new();
        for i in 0..=Handle::MAX as u32 {
            tree.add(&i.to_be_bytes());
        }
        assert_eq!(tree.len(), Handle::MAX + 1);
        // Repeats reuse their node.
        tree.add(&0u32.to_be_bytes());
        tree.add(&(Handle::MAX as u32 + 1).to_be_bytes());
    }

    #[test]
    fn iterator_reports_exact_size() {
        let tree = add_all(&["d", "b", "a", "c", "e"]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 5);
        iter.next();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.clone().count(), 4);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_matches_btreemap(keys in prop::collection::vec(prop::collection::vec(0u8..5, 0..4), 0..500)) {
            let mut tree: RawCountTree<u8> = RawCountTree::new();
            let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

            for key in &keys {
                let (handle, created) = tree.add(key);
                let counter = model.entry(key.clone()).or_insert(0);
                prop_assert_eq!(created, *counter == 0);
                *counter += 1;
                prop_assert_eq!(tree.key(handle), key.as_slice());
                prop_assert_eq!(tree.node(handle).count(), *counter);
            }

            tree.validate_invariants();
            prop_assert_eq!(tree.len(), model.len());
            prop_assert_eq!(tree.total(), keys.len() as u64);

            let actual: Vec<(Vec<u8>, u64)> = tree.iter().map(|(key, count)| (key.to_vec(), count)).collect();
            let expected: Vec<(Vec<u8>, u64)> = model.into_iter().collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn every_prefix_of_insertions_is_valid(keys in prop::collection::vec(any::<u16>(), 0..200)) {
            let mut tree: RawCountTree<u8> = RawCountTree::new();
            for key in keys {
                tree.add(&key.to_be_bytes());
                tree.validate_invariants();
            }
        }
    }
}
