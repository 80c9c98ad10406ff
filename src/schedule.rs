// src/schedule.rs
// Rebroadcast ring: one slot per future polling cycle, no per-alert timers.

use std::collections::VecDeque;

/// The chunks of one segmented alert, dispatched as a unit.
pub type ChunkSequence = Vec<String>;

/// A sliding ring of future cycle slots. Each cycle pops the front slot and
/// appends a fresh one at the back, so slot `i` is always "`i + 1` cycles from
/// now". Scheduling inserts the same chunk sequence into `repeat_count`
/// evenly spaced slots; the ring is pre-sized to `repeat_count * repeat_cycles`
/// so every insertion is in bounds.
///
/// With either parameter zero the feature is inert: no ring is allocated and
/// both operations are no-ops.
#[derive(Debug)]
pub struct RebroadcastQueue {
    slots: VecDeque<Vec<ChunkSequence>>,
    repeat_count: usize,
    repeat_cycles: usize,
}

impl RebroadcastQueue {
    pub fn new(repeat_count: usize, repeat_cycles: usize) -> Self {
        let len = if repeat_count > 0 && repeat_cycles > 0 {
            repeat_count * repeat_cycles
        } else {
            0
        };
        Self {
            slots: (0..len).map(|_| Vec::new()).collect(),
            repeat_count,
            repeat_cycles,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.repeat_count > 0 && self.repeat_cycles > 0
    }

    /// Pop the slot that is due this cycle and rotate the window. Returns the
    /// pending sequences in insertion order. Call exactly once per cycle,
    /// before processing that cycle's new alerts.
    pub fn advance(&mut self) -> Vec<ChunkSequence> {
        if !self.is_enabled() {
            return Vec::new();
        }
        let due = self.slots.pop_front().unwrap_or_default();
        self.slots.push_back(Vec::new());
        due
    }

    /// Enroll one alert's chunks for `repeat_count` future re-sends, landing
    /// `repeat_cycles` apart: slots `k * repeat_cycles - 1` for k = 1..=count.
    pub fn schedule(&mut self, chunks: &[String]) {
        if !self.is_enabled() {
            return;
        }
        for k in 1..=self.repeat_count {
            let slot = k * self.repeat_cycles - 1;
            self.slots[slot].push(chunks.to_vec());
            tracing::debug!(slot = slot + 1, n = chunks.len(), "queued rebroadcast");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(label: &str) -> Vec<String> {
        vec![format!("{label} 1/2"), format!("{label} 2/2")]
    }

    #[test]
    fn disabled_queue_is_inert() {
        let mut q = RebroadcastQueue::new(0, 2);
        assert!(!q.is_enabled());
        q.schedule(&msgs("a"));
        assert!(q.advance().is_empty());

        let mut q = RebroadcastQueue::new(2, 0);
        assert!(!q.is_enabled());
        assert!(q.advance().is_empty());
    }

    #[test]
    fn repeats_land_at_exact_cycle_offsets() {
        // repeat 2 times, 3 cycles apart: ring length 6, due at offsets 2 and 5.
        let mut q = RebroadcastQueue::new(2, 3);
        q.schedule(&msgs("alert"));

        let mut due_at = Vec::new();
        for cycle in 0..8 {
            let due = q.advance();
            if !due.is_empty() {
                due_at.push(cycle);
                assert_eq!(due, vec![msgs("alert")]);
            }
        }
        assert_eq!(due_at, vec![2, 5]);
    }

    #[test]
    fn slot_preserves_insertion_order() {
        let mut q = RebroadcastQueue::new(1, 1);
        q.schedule(&msgs("first"));
        q.schedule(&msgs("second"));
        let due = q.advance();
        assert_eq!(due, vec![msgs("first"), msgs("second")]);
    }

    #[test]
    fn window_slides_for_later_enrollments() {
        let mut q = RebroadcastQueue::new(1, 2);
        q.schedule(&msgs("early"));
        assert!(q.advance().is_empty()); // cycle 0
        q.schedule(&msgs("late"));
        assert_eq!(q.advance(), vec![msgs("early")]); // cycle 1
        assert_eq!(q.advance(), vec![msgs("late")]); // cycle 2
        assert!(q.advance().is_empty());
    }
}
