use std::fmt;

/// Which observer noticed the death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathSource {
    /// Health fell to zero after a tick where the player was alive.
    HealthDrop,
    /// Game mode switched to spectator (servers that skip the death screen).
    SpectatorTransition,
    /// The server broadcast "<self> was killed".
    ChatDeathMessage,
    /// Inventory wiped while a revive item was in hand, without a pop.
    InventoryClearHeuristic,
}

impl fmt::Display for DeathSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeathSource::HealthDrop => "health_drop",
            DeathSource::SpectatorTransition => "spectator_transition",
            DeathSource::ChatDeathMessage => "chat_death_message",
            DeathSource::InventoryClearHeuristic => "inventory_clear",
        };
        f.write_str(name)
    }
}

/// One observation of a death. Consumed immediately by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathSignal {
    pub source: DeathSource,
    pub observed_at_nanos: u64,
}

impl DeathSignal {
    pub fn new(source: DeathSource, observed_at_nanos: u64) -> Self {
        Self {
            source,
            observed_at_nanos,
        }
    }
}

/// Deduplicated death, eligible to produce a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathEvent {
    pub first_signal: DeathSignal,
    /// Later signals within this window of the resulting verdict are dropped.
    pub dedup_window_nanos: u64,
}

impl DeathEvent {
    pub fn source(&self) -> DeathSource {
        self.first_signal.source
    }

    pub fn observed_at_nanos(&self) -> u64 {
        self.first_signal.observed_at_nanos
    }

    /// Spectator deaths report without timing.
    pub fn is_spectator_transition(&self) -> bool {
        self.first_signal.source == DeathSource::SpectatorTransition
    }
}
