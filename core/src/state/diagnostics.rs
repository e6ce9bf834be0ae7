use chrono::NaiveDateTime;

use crate::classifier::Verdict;

/// Detection history kept for external inspection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Wall time of the last ghost verdict.
    pub last_ghost_totem_time: Option<NaiveDateTime>,
    /// Hold time of the last timed verdict.
    pub ghost_totem_hold_ms: Option<i64>,
    pub ghost_verdicts: u64,
    pub ordinary_deaths: u64,
    pub failed_deliveries: u64,
}

impl Diagnostics {
    pub fn record_ghost(&mut self, verdict: &Verdict, wall_time: NaiveDateTime) {
        self.last_ghost_totem_time = Some(wall_time);
        if verdict.is_timed() {
            self.ghost_totem_hold_ms = Some(verdict.held_duration_millis);
        }
        self.ghost_verdicts += 1;
    }
}
