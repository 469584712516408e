// Input queue — buffered keystrokes waiting for the tokenizer.
//
// The first stage of the latency model: keystrokes accumulate here and the
// orchestrator drains a bounded chunk per tick. Typing faster than the
// pipeline consumes shows up as a rising level, and past capacity the oldest
// keystrokes are lost (observable through the overflow counter, never an
// error).

use crate::queue::BoundedQueue;
use lyrebird_text::Keystroke;

/// FIFO queue of keystrokes feeding the Sheet Text tokenizer.
#[derive(Debug, Clone)]
pub struct InputQueue {
    queue: BoundedQueue<Keystroke>,
}

impl InputQueue {
    pub fn new(capacity: usize) -> Self {
        InputQueue {
            queue: BoundedQueue::new(capacity),
        }
    }

    /// Append a keystroke, dropping the oldest entry if at capacity.
    pub fn push(&mut self, keystroke: Keystroke) {
        self.queue.push(keystroke);
    }

    /// Look at the next `n` keystrokes without consuming them. `n` beyond
    /// the current length returns all available.
    pub fn peek(&self, n: usize) -> Vec<Keystroke> {
        self.queue.peek_n(n).into_iter().copied().collect()
    }

    /// Remove and return up to `n` keystrokes, fewer if the queue is shorter.
    pub fn consume(&mut self, n: usize) -> Vec<Keystroke> {
        let count = n.min(self.queue.len());
        (0..count).filter_map(|_| self.queue.pop()).collect()
    }

    /// Fill ratio in [0, 1], recomputed on demand.
    pub fn level(&self) -> f32 {
        self.queue.level()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Keystrokes lost to overflow since construction.
    pub fn overflow_count(&self) -> u64 {
        self.queue.overflow_count()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
