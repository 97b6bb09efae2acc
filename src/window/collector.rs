/// Fixed-capacity ring buffer holding the window being filled.
///
/// Every symbol is stored twice, at `slot` and `slot + capacity`, so the live
/// contents are always one contiguous slice no matter where the logical start
/// is. Sliding forward moves the start instead of shifting elements.
#[derive(Clone, Debug)]
pub(crate) struct Collector<T> {
    buffer: Box<[T]>,
    capacity: usize,
    start: usize,
    len: usize,
}

impl<T: Copy + Default> Collector<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "`Collector::new()` - `capacity` must be positive!");
        Self {
            buffer: vec![T::default(); capacity * 2].into_boxed_slice(),
            capacity,
            start: 0,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends `symbol`. Returns `true` once the buffer is full.
    pub(crate) fn push(&mut self, symbol: T) -> bool {
        debug_assert!(self.len < self.capacity, "push into a full collector");
        let slot = (self.start + self.len) % self.capacity;
        self.buffer[slot] = symbol;
        self.buffer[slot + self.capacity] = symbol;
        self.len += 1;
        self.len == self.capacity
    }

    /// The collected symbols, oldest first.
    #[inline]
    pub(crate) fn window(&self) -> &[T] {
        &self.buffer[self.start..self.start + self.len]
    }

    /// Forgets the oldest symbol.
    pub(crate) fn drop_oldest(&mut self) {
        debug_assert!(self.len > 0, "drop from an empty collector");
        self.start = (self.start + 1) % self.capacity;
        self.len -= 1;
    }

    pub(crate) fn reset(&mut self) {
        self.start = 0;
        self.len = 0;
    }
}
