//! Verdict classifier.
//!
//! State machine per death event:
//! - Idle: no revive item tracked
//! - TrackingTotem: a session is open
//! - GhostConfirmed / RevivedOrUnrelated: terminal, back to Idle
//!
//! The session is handed in by value, so classifying is what closes it.
//! A second death signal for the same episode therefore lands in the Idle
//! branch instead of reporting twice.

use ghostwatch_types::{Hand, PlayerState};

use crate::events::{DeathEvent, DeathSource};
use crate::tracking::TotemSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictKind {
    GhostTotem,
    OrdinaryDeath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A tracked session supplied timing.
    Timed,
    /// Death signalled while the player still looks alive; no timing.
    Untimed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub kind: VerdictKind,
    pub confidence: Confidence,
    pub source: DeathSource,
    pub hand: Hand,
    pub held_duration_millis: i64,
    pub ticks_held: i64,
    pub spectator_transition: bool,
    pub detected_at_nanos: u64,
    /// Tick the session opened on, for diagnostics.
    pub equip_tick: Option<u64>,
    pub death_tick: u64,
}

impl Verdict {
    pub fn is_ghost(&self) -> bool {
        self.kind == VerdictKind::GhostTotem
    }

    pub fn is_timed(&self) -> bool {
        self.confidence == Confidence::Timed
    }
}

/// Classify one death event.
///
/// `player` is the host snapshot at classification time, `None` when the
/// host has no player context.
pub fn classify(
    event: &DeathEvent,
    session: Option<TotemSession>,
    player: Option<&PlayerState>,
    now_nanos: u64,
    tick: u64,
) -> Verdict {
    match session {
        Some(session) => classify_tracked(event, session, player, now_nanos, tick),
        None => classify_idle(event, player, now_nanos, tick),
    }
}

fn classify_tracked(
    event: &DeathEvent,
    session: TotemSession,
    player: Option<&PlayerState>,
    now_nanos: u64,
    tick: u64,
) -> Verdict {
    let held = session.held(now_nanos, tick);
    let mut hand = player.map_or(Hand::Unknown, PlayerState::totem_hand);

    // A wiped inventory always reads Unknown; the equip-time hand is the
    // best remaining evidence (see "Hand for inventory-clear verdicts" in
    // DESIGN.md).
    if hand == Hand::Unknown && event.source() == DeathSource::InventoryClearHeuristic {
        hand = session.hand;
    }

    Verdict {
        kind: VerdictKind::GhostTotem,
        confidence: Confidence::Timed,
        source: event.source(),
        hand,
        held_duration_millis: held.millis,
        ticks_held: held.ticks,
        spectator_transition: event.is_spectator_transition(),
        detected_at_nanos: now_nanos,
        equip_tick: Some(session.equip_tick),
        death_tick: tick,
    }
}

fn classify_idle(
    event: &DeathEvent,
    player: Option<&PlayerState>,
    now_nanos: u64,
    tick: u64,
) -> Verdict {
    // Still alive and not spectating after a death signal: the server
    // announced a death the client never saw.
    let still_alive = player.is_some_and(|p| p.is_alive() && !p.is_spectator());

    Verdict {
        kind: if still_alive {
            VerdictKind::GhostTotem
        } else {
            VerdictKind::OrdinaryDeath
        },
        confidence: Confidence::Untimed,
        source: event.source(),
        hand: Hand::Unknown,
        held_duration_millis: 0,
        ticks_held: 0,
        spectator_transition: event.is_spectator_transition(),
        detected_at_nanos: now_nanos,
        equip_tick: None,
        death_tick: tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DeathSignal;
    use ghostwatch_types::{GameMode, HandItem};

    const MS: u64 = 1_000_000;

    fn event(source: DeathSource, at: u64) -> DeathEvent {
        DeathEvent {
            first_signal: DeathSignal::new(source, at),
            dedup_window_nanos: 1000 * MS,
        }
    }

    fn session(hand: Hand) -> TotemSession {
        TotemSession {
            equip_nanos: 5_000 * MS,
            equip_tick: 100,
            hand,
        }
    }

    #[test]
    fn tracked_death_is_timed_ghost() {
        let player = PlayerState {
            health: 0.0,
            off_hand: HandItem::Totem,
            ..Default::default()
        };
        let verdict = classify(
            &event(DeathSource::HealthDrop, 5_151 * MS),
            Some(session(Hand::OffHand)),
            Some(&player),
            5_151 * MS,
            103,
        );

        assert_eq!(verdict.kind, VerdictKind::GhostTotem);
        assert!(verdict.is_timed());
        assert_eq!(verdict.hand, Hand::OffHand);
        assert_eq!(verdict.held_duration_millis, 151);
        assert_eq!(verdict.ticks_held, 3);
        assert!(!verdict.spectator_transition);
        assert_eq!(verdict.equip_tick, Some(100));
    }

    #[test]
    fn vanished_item_reads_unknown_hand() {
        let player = PlayerState::default();
        let verdict = classify(
            &event(DeathSource::SpectatorTransition, 0),
            Some(session(Hand::MainHand)),
            Some(&player),
            5_200 * MS,
            104,
        );
        assert_eq!(verdict.hand, Hand::Unknown);
        assert!(verdict.spectator_transition);
    }

    #[test]
    fn inventory_clear_falls_back_to_equip_hand() {
        let player = PlayerState {
            empty_main_slots: 36,
            ..Default::default()
        };
        let verdict = classify(
            &event(DeathSource::InventoryClearHeuristic, 0),
            Some(session(Hand::OffHand)),
            Some(&player),
            5_100 * MS,
            102,
        );
        assert_eq!(verdict.hand, Hand::OffHand);
    }

    #[test]
    fn idle_and_alive_is_untimed_ghost() {
        let player = PlayerState::default();
        let verdict = classify(
            &event(DeathSource::ChatDeathMessage, 0),
            None,
            Some(&player),
            0,
            1,
        );
        assert_eq!(verdict.kind, VerdictKind::GhostTotem);
        assert_eq!(verdict.confidence, Confidence::Untimed);
        assert_eq!(verdict.hand, Hand::Unknown);
        assert_eq!(verdict.held_duration_millis, 0);
        assert_eq!(verdict.ticks_held, 0);
    }

    #[test]
    fn idle_and_dead_is_ordinary() {
        let dead = PlayerState {
            health: 0.0,
            is_dead: true,
            ..Default::default()
        };
        let spectator = PlayerState {
            game_mode: Some(GameMode::Spectator),
            ..Default::default()
        };

        for player in [&dead, &spectator] {
            let verdict = classify(&event(DeathSource::HealthDrop, 0), None, Some(player), 0, 1);
            assert_eq!(verdict.kind, VerdictKind::OrdinaryDeath);
        }

        let verdict = classify(&event(DeathSource::ChatDeathMessage, 0), None, None, 0, 1);
        assert_eq!(verdict.kind, VerdictKind::OrdinaryDeath);
    }
}
