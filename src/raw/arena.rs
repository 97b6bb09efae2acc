use super::handle::Handle;

/// Append-only node storage.
///
/// Counting trees never delete a key, so slots are never recycled: a handle
/// stays valid (and keeps pointing at the same node) until the arena is
/// cleared.
#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        // After the push the new index must not exceed `Handle::MAX`.
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        self.slots.push(element);
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        &self.slots[handle.to_index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        &mut self.slots[handle.to_index()]
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
