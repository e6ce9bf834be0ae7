//! Tunable detector thresholds.
//!
//! The defaults encode empirical tuning against one server's behavior
//! (display cutoff, inventory-wipe fraction, signal windows). They are
//! heuristics, so they live in config instead of being baked into the
//! engine.

use serde::{Deserialize, Serialize};

use crate::DeliveryMode;

/// Detector configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Signals this close to the last processed verdict belong to the same death.
    pub dedup_window_ms: u64,
    /// A legitimate pop this recent vetoes the inventory-clear heuristic.
    pub pop_window_ms: u64,
    /// A self-death chat line must be at least this recent for the heuristic.
    pub chat_death_window_ms: u64,
    /// Empty main slots needed to treat the inventory as wiped.
    pub cleared_inventory_min_empty: u32,
    pub main_inventory_slots: u32,
    /// Longest hold time still shown in the public message.
    pub timing_display_max_ms: i64,
    /// Radius used to pick whisper vs broadcast.
    pub nearby_radius: f64,
    pub reminder_delay_ms: u64,
    /// Nominal tick length, only used for diagnostics.
    pub tick_millis: u64,
    pub default_mode: DeliveryMode,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            dedup_window_ms: 1000,
            pop_window_ms: 2000,
            chat_death_window_ms: 5000,
            cleared_inventory_min_empty: 27,
            main_inventory_slots: 36,
            timing_display_max_ms: 300,
            nearby_radius: 16.0,
            reminder_delay_ms: 3000,
            tick_millis: 50,
            default_mode: DeliveryMode::Clipboard,
        }
    }
}

impl DetectorConfig {
    /// Reject values the engine cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main_inventory_slots == 0 {
            return Err(ConfigError::EmptyInventory);
        }
        if self.cleared_inventory_min_empty > self.main_inventory_slots {
            return Err(ConfigError::ClearThresholdTooHigh {
                threshold: self.cleared_inventory_min_empty,
                slots: self.main_inventory_slots,
            });
        }
        if !self.nearby_radius.is_finite() || self.nearby_radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.nearby_radius));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    pub fn dedup_window_nanos(&self) -> u64 {
        self.dedup_window_ms.saturating_mul(1_000_000)
    }

    pub fn reminder_delay_nanos(&self) -> u64 {
        self.reminder_delay_ms.saturating_mul(1_000_000)
    }
}

/// Invalid detector configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("main inventory must have at least one slot")]
    EmptyInventory,
    #[error("cleared inventory threshold {threshold} exceeds the {slots} main slots")]
    ClearThresholdTooHigh { threshold: u32, slots: u32 },
    #[error("nearby radius must be a positive finite number, got {0}")]
    InvalidRadius(f64),
    #[error("tick length must be non-zero")]
    ZeroTick,
}
