use ghostwatch_types::{Hand, PlayerState};

/// An open "revive item in hand" episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotemSession {
    pub equip_nanos: u64,
    pub equip_tick: u64,
    pub hand: Hand,
}

impl TotemSession {
    pub fn held(&self, now_nanos: u64, now_tick: u64) -> HeldDuration {
        HeldDuration {
            millis: (now_nanos.saturating_sub(self.equip_nanos) / 1_000_000) as i64,
            ticks: now_tick.saturating_sub(self.equip_tick) as i64,
        }
    }
}

/// How long a session lasted, in wall milliseconds and game ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldDuration {
    pub millis: i64,
    pub ticks: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotemTransition {
    Equipped(TotemSession),
    /// The session stays open until the caller runs [`TotemTracker::clear`],
    /// so an inventory-clear verdict can still consume it.
    Unequipped {
        session: TotemSession,
        held: HeldDuration,
    },
}

/// Per-tick hand inspection state.
#[derive(Debug, Clone, Default)]
pub struct TotemTracker {
    session: Option<TotemSession>,
    was_holding: bool,
}

impl TotemTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's hand state; returns the edge, if any.
    pub fn observe(
        &mut self,
        holding: bool,
        hand: Hand,
        now_nanos: u64,
        tick: u64,
    ) -> Option<TotemTransition> {
        if holding == self.was_holding {
            return None;
        }
        self.was_holding = holding;

        if holding {
            if self.session.is_some() {
                return None;
            }
            let session = TotemSession {
                equip_nanos: now_nanos,
                equip_tick: tick,
                hand,
            };
            self.session = Some(session);
            Some(TotemTransition::Equipped(session))
        } else {
            let session = self.session?;
            Some(TotemTransition::Unequipped {
                session,
                held: session.held(now_nanos, tick),
            })
        }
    }

    /// Close the session and hand it to a classifier.
    pub fn take_session(&mut self) -> Option<TotemSession> {
        self.session.take()
    }

    pub fn clear(&mut self) {
        self.session = None;
    }

    /// Forget everything, including last tick's hand state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn session(&self) -> Option<&TotemSession> {
        self.session.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    /// Equip time of the open session, 0 when not tracking.
    pub fn equip_time_nanos(&self) -> u64 {
        self.session.map_or(0, |s| s.equip_nanos)
    }

    pub fn equip_tick(&self) -> u64 {
        self.session.map_or(0, |s| s.equip_tick)
    }

    pub fn held_hand(&self) -> Hand {
        self.session.map_or(Hand::Unknown, |s| s.hand)
    }

    pub fn was_holding(&self) -> bool {
        self.was_holding
    }
}

/// Player carries a revive item but holds none in either hand.
pub fn totem_warning_active(player: &PlayerState) -> bool {
    !player.is_holding_totem() && player.totems_in_inventory > 0
}
