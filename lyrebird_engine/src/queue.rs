// Bounded FIFO queue — a ring buffer over a fixed-size arena.
//
// Both pipeline queues (keystrokes in, phoneme events out) are instances of
// this one structure. The arena is allocated once at construction and never
// grows; overflow drops the *oldest* entry and bumps a counter instead of
// erroring. Latency is a visible game resource, so the queue exposes its
// fill level directly.
//
// All operations are O(1) except `peek_n`, which is O(n) in the items
// returned.

/// A fixed-capacity FIFO that drops its oldest entry on overflow.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    arena: Vec<Option<T>>,
    head: usize,
    len: usize,
    dropped: u64,
}

impl<T> BoundedQueue<T> {
    /// Create a queue with the given capacity.
    ///
    /// Capacity must be positive; the engine config validates this before
    /// any queue is built.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BoundedQueue capacity must be positive");
        let mut arena = Vec::with_capacity(capacity);
        arena.resize_with(capacity, || None);
        BoundedQueue {
            arena,
            head: 0,
            len: 0,
            dropped: 0,
        }
    }

    /// Append an item. If the queue is full, the oldest entry is dropped
    /// first and the overflow counter increments. Returns `true` if an old
    /// entry was dropped to make room.
    pub fn push(&mut self, item: T) -> bool {
        let mut overflowed = false;
        if self.len == self.arena.len() {
            self.pop();
            self.dropped += 1;
            overflowed = true;
        }
        let tail = (self.head + self.len) % self.arena.len();
        self.arena[tail] = Some(item);
        self.len += 1;
        overflowed
    }

    /// Remove and return the oldest item, or `None` if empty. Never blocks.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.arena[self.head].take();
        self.head = (self.head + 1) % self.arena.len();
        self.len -= 1;
        item
    }

    /// The next `n` items in FIFO order, without removal. Asking for more
    /// than are queued returns all available — never an error.
    pub fn peek_n(&self, n: usize) -> Vec<&T> {
        let count = n.min(self.len);
        (0..count)
            .map(|i| {
                let idx = (self.head + i) % self.arena.len();
                self.arena[idx].as_ref().expect("occupied ring slot")
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.arena.len()
    }

    /// Fill ratio in [0, 1]: occupancy / capacity.
    pub fn level(&self) -> f32 {
        self.len as f32 / self.arena.len() as f32
    }

    /// How many entries have been dropped to overflow since construction.
    pub fn overflow_count(&self) -> u64 {
        self.dropped
    }

    /// Remove all items. The overflow counter is preserved.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}
