//! Revive item tracking.
//!
//! ```text
//!   hands: no totem ──► totem in hand ──► no totem
//!                       │  Equipped        │  Unequipped
//!                       ▼                  ▼
//!                  TotemSession       held duration + inventory-clear check
//!                  (time, tick, hand)
//! ```
//!
//! A session is also taken, and therefore closed, by the first death
//! classification while it is open.

mod heuristic;
mod session;

pub use heuristic::InventoryClearCheck;
pub use session::{HeldDuration, TotemSession, TotemTracker, TotemTransition, totem_warning_active};
