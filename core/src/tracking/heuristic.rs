//! Inventory-clear ghost heuristic.
//!
//! Some servers wipe the inventory and broadcast the death message before
//! the client renders a pop, so the equip/death timing never fires. The
//! wipe itself, a now-empty hand, a recent self-death broadcast, and the
//! absence of a pop packet together point at a ghost.

use ghostwatch_types::{DetectorConfig, PlayerState};

/// Inputs to the heuristic, captured right after an unequip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryClearCheck {
    pub empty_slots: u32,
    pub hand_now_empty: bool,
    /// Milliseconds since the last legitimate pop, `None` if never seen.
    pub since_pop_ms: Option<u64>,
    /// Milliseconds since the last self-death chat line, `None` if never seen.
    pub since_self_death_chat_ms: Option<u64>,
}

impl InventoryClearCheck {
    pub fn capture(
        player: &PlayerState,
        since_pop_ms: Option<u64>,
        since_self_death_chat_ms: Option<u64>,
    ) -> Self {
        Self {
            empty_slots: player.empty_main_slots,
            hand_now_empty: player.any_hand_empty(),
            since_pop_ms,
            since_self_death_chat_ms,
        }
    }

    pub fn inventory_cleared(&self, config: &DetectorConfig) -> bool {
        self.empty_slots >= config.cleared_inventory_min_empty
    }

    pub fn popped_recently(&self, config: &DetectorConfig) -> bool {
        self.since_pop_ms.is_some_and(|ms| ms < config.pop_window_ms)
    }

    pub fn recent_chat_death(&self, config: &DetectorConfig) -> bool {
        self.since_self_death_chat_ms
            .is_some_and(|ms| ms < config.chat_death_window_ms)
    }

    /// All four conditions must hold.
    pub fn is_probable_ghost(&self, config: &DetectorConfig) -> bool {
        let cleared = self.inventory_cleared(config);
        let popped = self.popped_recently(config);
        let chat = self.recent_chat_death(config);

        tracing::debug!(
            empty_slots = self.empty_slots,
            inventory_cleared = cleared,
            hand_now_empty = self.hand_now_empty,
            popped_recently = popped,
            since_pop_ms = ?self.since_pop_ms,
            recent_chat_death = chat,
            since_chat_ms = ?self.since_self_death_chat_ms,
            "Inventory-clear check"
        );

        cleared && self.hand_now_empty && !popped && chat
    }
}
