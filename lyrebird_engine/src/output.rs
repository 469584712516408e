// Output queue — phoneme events awaiting synthesis, with zone and rate
// tracking.
//
// Buffer level is the core game mechanic: under the low threshold the voice
// starves, over the high threshold it strains, in between is the optimal
// zone the tracker rewards. Thresholds and capacity come from the
// difficulty preset at construction — nothing here is hardcoded.
//
// Fill and drain rates are estimated over a trailing window of push/pop
// timestamps. The windows are maintained incrementally: each operation
// trims expired entries from the front of a deque, so tick cost stays O(1)
// amortized no matter how long the session runs. Timestamps are
// caller-supplied session-monotonic milliseconds — the queue never reads a
// wall clock.

use crate::queue::BoundedQueue;
use lyrebird_voice::PhonemeEvent;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Classification of the output queue's fill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Starving: the synthesizer will run out of events.
    Under,
    /// The sweet spot the tracker rewards.
    Optimal,
    /// Backed up: typed sound is falling behind the typing.
    Over,
}

/// Derived snapshot of the output queue. Never persisted independently of
/// the queue it describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueState {
    /// Fill ratio in [0, 1].
    pub level: f32,
    /// Zone classification of `level` against the configured thresholds.
    pub zone: Zone,
    /// Events pushed per second over the trailing window.
    pub fill_rate: f32,
    /// Events popped per second over the trailing window.
    pub drain_rate: f32,
}

/// Bounded FIFO of phoneme events with windowed rate tracking.
#[derive(Debug, Clone)]
pub struct OutputQueue {
    queue: BoundedQueue<PhonemeEvent>,
    zone_low: f32,
    zone_high: f32,
    window_ms: u64,
    push_times: VecDeque<u64>,
    pop_times: VecDeque<u64>,
}

impl OutputQueue {
    /// Build a queue with the given capacity, zone thresholds, and rate
    /// window. The engine config validates `capacity > 0` and
    /// `0 <= zone_low < zone_high <= 1` before construction.
    pub fn new(capacity: usize, zone_low: f32, zone_high: f32, window_ms: u64) -> Self {
        OutputQueue {
            queue: BoundedQueue::new(capacity),
            zone_low,
            zone_high,
            window_ms,
            push_times: VecDeque::new(),
            pop_times: VecDeque::new(),
        }
    }

    /// Enqueue a batch of events at session time `now_ms`, dropping the
    /// oldest entries on overflow.
    pub fn push_batch(&mut self, events: Vec<PhonemeEvent>, now_ms: u64) {
        for event in events {
            self.queue.push(event);
            self.push_times.push_back(now_ms);
        }
        trim_window(&mut self.push_times, now_ms, self.window_ms);
    }

    /// Remove and return the earliest event, or `None` on empty. Never
    /// blocks.
    pub fn pop(&mut self, now_ms: u64) -> Option<PhonemeEvent> {
        let event = self.queue.pop();
        if event.is_some() {
            self.pop_times.push_back(now_ms);
        }
        trim_window(&mut self.pop_times, now_ms, self.window_ms);
        event
    }

    /// Current state snapshot at session time `now_ms`.
    pub fn state(&mut self, now_ms: u64) -> QueueState {
        trim_window(&mut self.push_times, now_ms, self.window_ms);
        trim_window(&mut self.pop_times, now_ms, self.window_ms);

        let level = self.queue.level();
        let zone = if level < self.zone_low {
            Zone::Under
        } else if level > self.zone_high {
            Zone::Over
        } else {
            Zone::Optimal
        };

        QueueState {
            level,
            zone,
            fill_rate: window_rate(&self.push_times, now_ms),
            drain_rate: window_rate(&self.pop_times, now_ms),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn level(&self) -> f32 {
        self.queue.level()
    }

    /// Events lost to overflow since construction.
    pub fn overflow_count(&self) -> u64 {
        self.queue.overflow_count()
    }
}

/// Drop timestamps that have aged out of the trailing window.
fn trim_window(times: &mut VecDeque<u64>, now_ms: u64, window_ms: u64) {
    let cutoff = now_ms.saturating_sub(window_ms);
    while times.front().is_some_and(|&t| t < cutoff) {
        times.pop_front();
    }
}

/// Events per second over the retained window. A zero-duration window
/// (all timestamps at `now_ms`) reports 0.0 rather than dividing by zero.
fn window_rate(times: &VecDeque<u64>, now_ms: u64) -> f32 {
    let Some(&oldest) = times.front() else {
        return 0.0;
    };
    let elapsed_ms = now_ms.saturating_sub(oldest);
    if elapsed_ms == 0 {
        return 0.0;
    }
    times.len() as f32 / (elapsed_ms as f32 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(phoneme: &str) -> PhonemeEvent {
        PhonemeEvent {
            phoneme: phoneme.into(),
            start_ms: 0,
            duration_ms: 100,
            volume: 0.5,
            pitch_hz: 220.0,
            vibrato: false,
            breathiness: 0.0,
            harmony_intervals: Default::default(),
        }
    }

    fn queue() -> OutputQueue {
        OutputQueue::new(10, 0.2, 0.8, 2000)
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut q = queue();
        assert!(q.pop(0).is_none());
    }

    #[test]
    fn full_queue_is_over_zone_at_level_one() {
        let mut q = queue();
        q.push_batch((0..10).map(|i| event(&format!("p{i}"))).collect(), 0);
        let state = q.state(0);
        assert_eq!(state.level, 1.0);
        assert_eq!(state.zone, Zone::Over);
    }

    #[test]
    fn drained_queue_is_under_zone_at_level_zero() {
        let mut q = queue();
        q.push_batch(vec![event("a"), event("b")], 0);
        while q.pop(100).is_some() {}
        let state = q.state(100);
        assert_eq!(state.level, 0.0);
        assert_eq!(state.zone, Zone::Under);
    }

    #[test]
    fn mid_fill_is_optimal() {
        let mut q = queue();
        q.push_batch((0..5).map(|_| event("x")).collect(), 0);
        assert_eq!(q.state(0).zone, Zone::Optimal);
    }

    #[test]
    fn thresholds_come_from_construction() {
        // A narrow expert-style zone: the same 50% fill reads as Over.
        let mut q = OutputQueue::new(10, 0.35, 0.45, 2000);
        q.push_batch((0..5).map(|_| event("x")).collect(), 0);
        assert_eq!(q.state(0).zone, Zone::Over);
    }

    #[test]
    fn overflow_drops_oldest_events() {
        let mut q = OutputQueue::new(3, 0.2, 0.8, 2000);
        q.push_batch(
            vec![event("a"), event("b"), event("c"), event("d")],
            0,
        );
        assert_eq!(q.overflow_count(), 1);
        assert_eq!(q.pop(0).unwrap().phoneme, "b", "oldest event is dropped");
    }

    #[test]
    fn fill_rate_counts_recent_pushes() {
        let mut q = queue();
        q.push_batch(vec![event("a")], 0);
        q.push_batch(vec![event("b")], 500);
        q.push_batch(vec![event("c")], 1000);
        let state = q.state(1000);
        // 3 events over 1 second.
        assert!((state.fill_rate - 3.0).abs() < 1e-5, "got {}", state.fill_rate);
        assert_eq!(state.drain_rate, 0.0);
    }

    #[test]
    fn rates_expire_outside_the_window() {
        let mut q = queue();
        q.push_batch(vec![event("a"), event("b")], 0);
        // 3 seconds later the pushes have aged out of the 2-second window.
        let state = q.state(3000);
        assert_eq!(state.fill_rate, 0.0);
    }

    #[test]
    fn degenerate_window_reports_zero_rate() {
        let mut q = queue();
        q.push_batch(vec![event("a"), event("b")], 1000);
        // All timestamps equal "now": no elapsed time, rate must be 0.
        let state = q.state(1000);
        assert_eq!(state.fill_rate, 0.0);
    }

    #[test]
    fn drain_rate_counts_pops() {
        let mut q = queue();
        q.push_batch((0..4).map(|_| event("x")).collect(), 0);
        q.pop(200);
        q.pop(400);
        q.pop(600);
        let state = q.state(600);
        assert!(state.drain_rate > 0.0);
        // 3 pops over 0.4s = 7.5/s.
        assert!((state.drain_rate - 7.5).abs() < 1e-4, "got {}", state.drain_rate);
    }

    #[test]
    fn state_serializes() {
        let mut q = queue();
        q.push_batch(vec![event("a")], 0);
        let state = q.state(0);
        let json = serde_json::to_string(&state).unwrap();
        let restored: QueueState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
