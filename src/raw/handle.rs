use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Index of a node in the tree's node arena.
///
/// Stored off by one inside a `NonZero` so that `Option<Handle>`, which is how
/// every child link is spelled, costs no more than the handle itself.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// Last arena slot a handle can name. Every distinct key owns one node,
    /// so a tree holds at most `MAX + 1` keys; the arena panics past that.
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Handle for the node stored at arena slot `index`.
    ///
    /// Only the arena calls this, right after pushing a node, so `index` is
    /// always the slot it just filled.
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    /// Arena slot of the node this handle names.
    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_index())
    }
}
