//! Shared types for Ghostwatch.
//!
//! Everything here is plain data: game-facing enums the host fills in,
//! the delivery mode toggle, and the tunable detector thresholds. The
//! engine itself lives in `ghostwatch-core`.

pub mod formatting;

mod config;
mod game;

pub use config::{ConfigError, DetectorConfig};
pub use game::{DeliveryMode, GameMode, Hand, HandItem, PlayerRef, PlayerState};
