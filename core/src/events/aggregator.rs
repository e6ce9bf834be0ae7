//! Single entry point for death signals.
//!
//! Dedup keys off the time of the last processed verdict rather than the
//! last signal: a burst of signals for one death must not be able to extend
//! its own window indefinitely.

use super::{DeathEvent, DeathSignal};

#[derive(Debug, Clone)]
pub struct DeathAggregator {
    dedup_window_nanos: u64,
    last_verdict_at: Option<u64>,
}

impl DeathAggregator {
    pub fn new(dedup_window_nanos: u64) -> Self {
        Self {
            dedup_window_nanos,
            last_verdict_at: None,
        }
    }

    /// Turn a signal into a death event, or `None` if it belongs to a death
    /// that already produced a verdict.
    pub fn accept(&self, signal: DeathSignal) -> Option<DeathEvent> {
        if self.is_duplicate(signal.observed_at_nanos) {
            tracing::debug!(
                source = %signal.source,
                "Ignoring death signal inside dedup window"
            );
            return None;
        }

        Some(DeathEvent {
            first_signal: signal,
            dedup_window_nanos: self.dedup_window_nanos,
        })
    }

    /// Record that a verdict was produced at `at_nanos`.
    pub fn mark_verdict(&mut self, at_nanos: u64) {
        self.last_verdict_at = Some(at_nanos);
    }

    pub fn last_verdict_at(&self) -> Option<u64> {
        self.last_verdict_at
    }

    fn is_duplicate(&self, at_nanos: u64) -> bool {
        self.last_verdict_at
            .is_some_and(|last| at_nanos.saturating_sub(last) < self.dedup_window_nanos)
    }
}
