//! Death signal observation and aggregation.
//!
//! Four observers report "the player died" independently. Each produces
//! a [`DeathSignal`]; the [`DeathAggregator`] collapses signals that belong
//! to the same death into a single [`DeathEvent`].

pub mod aggregator;
pub mod chat;
pub mod observer;
pub mod signal;

pub use aggregator::DeathAggregator;
pub use chat::{is_self_death, match_death_message};
pub use observer::LifeObserver;
pub use signal::{DeathEvent, DeathSignal, DeathSource};
