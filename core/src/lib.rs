pub mod classifier;
pub mod client;
pub mod clock;
pub mod detector;
pub mod events;
pub mod queue;
pub mod report;
pub mod scheduler;
pub mod state;
pub mod tracking;

#[cfg(test)]
mod testing;


// Re-exports for convenience
pub use classifier::{Confidence, Verdict, VerdictKind};
pub use client::{DeliveryError, GameClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use detector::GhostTotemDetector;
pub use events::{DeathSignal, DeathSource};
pub use queue::{EventSender, HostEvent, QueueClosed, channel, run_detector};
pub use report::{DeliveryOutcome, REMINDER_TEXT};
pub use state::Diagnostics;
pub use ghostwatch_types::{
    DeliveryMode, DetectorConfig, GameMode, Hand, HandItem, PlayerRef, PlayerState,
};
