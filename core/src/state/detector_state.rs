use crate::clock::millis_between;

/// Pure storage for observations that outlive a single tick.
/// Routing logic lives in `GhostTotemDetector`.
#[derive(Debug, Clone, Default)]
pub struct DetectorState {
    /// Last server-confirmed revive (entity status 35 for the local player).
    pub last_totem_pop_nanos: Option<u64>,
    /// Last chat line announcing the local player's death.
    pub last_self_death_chat_nanos: Option<u64>,
    pub last_selected_slot: Option<u8>,
    pub warning_active: bool,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn millis_since_pop(&self, now_nanos: u64) -> Option<u64> {
        self.last_totem_pop_nanos
            .map(|at| millis_between(at, now_nanos))
    }

    pub fn millis_since_self_death_chat(&self, now_nanos: u64) -> Option<u64> {
        self.last_self_death_chat_nanos
            .map(|at| millis_between(at, now_nanos))
    }

    /// Drop per-player context. Pop and chat timestamps survive: they are
    /// only ever compared against short windows.
    pub fn reset_player_context(&mut self) {
        self.last_selected_slot = None;
        self.warning_active = false;
    }
}
