//! One-shot deferred tasks, drained on the tick thread.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduledTask {
    /// Nudge the user toward picking a delivery mode.
    ModeReminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    fire_at_nanos: u64,
    seq: u64,
    task: ScheduledTask,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at_nanos, self.seq).cmp(&(other.fire_at_nanos, other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of `(fire_at, task)`. Equal deadlines fire in insertion order.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at_nanos: u64, task: ScheduledTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            fire_at_nanos,
            seq,
            task,
        }));
    }

    /// Pop every task whose deadline is at or before `now_nanos`.
    pub fn drain_due(&mut self, now_nanos: u64) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.heap.peek() {
            if entry.fire_at_nanos > now_nanos {
                break;
            }
            due.push(entry.task);
            self.heap.pop();
        }
        due
    }

    pub fn next_fire_at(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(e)| e.fire_at_nanos)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
