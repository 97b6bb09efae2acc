use core::ops::Range;

use super::handle::Handle;

/// Height of an empty subtree.
pub(crate) const EMPTY_HEIGHT: i8 = -1;

/// One distinct key of a counting tree.
///
/// The key elements themselves live in the tree's key pool; the node only
/// remembers where.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    key_start: usize,
    key_len: usize,
    count: u64,
    left: Option<Handle>,
    right: Option<Handle>,
    // A leaf has height 0. AVL heights stay below 1.45 * log2(n + 2), far
    // inside `i8` for anything an arena can address.
    height: i8,
}

/// Which child a traversal step went to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Node {
    /// Creates a leaf for a freshly inserted key. The count starts at one.
    pub(crate) fn new_leaf(key: Range<usize>) -> Self {
        Self {
            key_start: key.start,
            key_len: key.len(),
            count: 1,
            left: None,
            right: None,
            height: 0,
        }
    }

    /// Range of this node's key inside the key pool.
    #[inline]
    pub(crate) fn key_range(&self) -> Range<usize> {
        self.key_start..self.key_start + self.key_len
    }

    #[inline]
    pub(crate) fn count(&self) -> u64 {
        self.count
    }

    pub(crate) fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub(crate) fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    #[inline]
    pub(crate) fn height(&self) -> i8 {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: i8) {
        self.height = height;
    }
}
