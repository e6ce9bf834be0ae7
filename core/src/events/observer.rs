//! Tick-driven death observers: health drop and spectator transition.

use ghostwatch_types::{GameMode, PlayerState};

use super::{DeathSignal, DeathSource};

/// Remembers last tick's life state so each death fires once.
#[derive(Debug, Clone)]
pub struct LifeObserver {
    was_alive: bool,
    last_game_mode: Option<GameMode>,
    last_health: Option<f32>,
}

impl Default for LifeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifeObserver {
    pub fn new() -> Self {
        Self {
            was_alive: true,
            last_game_mode: None,
            last_health: None,
        }
    }

    /// Compare this tick's snapshot against the previous one.
    ///
    /// A spectator transition wins over a simultaneous health drop because
    /// it changes how the report is worded.
    pub fn observe(&mut self, player: &PlayerState, now_nanos: u64) -> Option<DeathSignal> {
        let alive = player.is_alive();
        let spectator_transition = self
            .last_game_mode
            .is_some_and(|mode| mode != GameMode::Spectator)
            && player.is_spectator();

        let signal = if spectator_transition {
            tracing::info!("Player transitioned to spectator mode (potential death)");
            Some(DeathSignal::new(DeathSource::SpectatorTransition, now_nanos))
        } else if self.was_alive && !alive {
            tracing::info!(
                health = player.health,
                is_dead = player.is_dead,
                "Death detected via tick health check"
            );
            Some(DeathSignal::new(DeathSource::HealthDrop, now_nanos))
        } else {
            None
        };

        self.was_alive = alive;
        self.last_health = Some(player.health);
        self.last_game_mode = player.game_mode;
        signal
    }

    /// Push-model health callback from the host.
    pub fn on_health_update(&mut self, health: f32, now_nanos: u64) -> Option<DeathSignal> {
        self.last_health = Some(health);
        if health > 0.0 || !self.was_alive {
            return None;
        }
        self.was_alive = false;
        tracing::info!(health, "Death detected via health update");
        Some(DeathSignal::new(DeathSource::HealthDrop, now_nanos))
    }

    pub fn last_health(&self) -> Option<f32> {
        self.last_health
    }

    /// True if anything has been observed since the last reset.
    pub fn has_state(&self) -> bool {
        self.last_health.is_some() || self.last_game_mode.is_some() || !self.was_alive
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive() -> PlayerState {
        PlayerState {
            name: "Steve".to_string(),
            ..Default::default()
        }
    }

    fn dead() -> PlayerState {
        PlayerState {
            health: 0.0,
            is_dead: true,
            ..alive()
        }
    }

    #[test]
    fn health_drop_fires_once() {
        let mut obs = LifeObserver::new();
        assert!(obs.observe(&alive(), 0).is_none());

        let signal = obs.observe(&dead(), 50).expect("death should fire");
        assert_eq!(signal.source, DeathSource::HealthDrop);
        assert_eq!(signal.observed_at_nanos, 50);

        assert!(obs.observe(&dead(), 100).is_none());
        assert!(obs.observe(&alive(), 150).is_none());
        assert!(obs.observe(&dead(), 200).is_some());
    }

    #[test]
    fn spectator_transition_needs_known_previous_mode() {
        let mut obs = LifeObserver::new();
        let spectator = PlayerState {
            game_mode: Some(GameMode::Spectator),
            ..alive()
        };
        let no_mode = PlayerState {
            game_mode: None,
            ..alive()
        };

        assert!(obs.observe(&no_mode, 0).is_none());
        assert!(obs.observe(&spectator, 50).is_none());

        assert!(obs.observe(&alive(), 100).is_none());
        let signal = obs.observe(&spectator, 150).expect("survival -> spectator");
        assert_eq!(signal.source, DeathSource::SpectatorTransition);
        assert!(obs.observe(&spectator, 200).is_none());
    }

    #[test]
    fn health_callback_suppresses_tick_refire() {
        let mut obs = LifeObserver::new();
        assert!(obs.observe(&alive(), 0).is_none());
        assert!(obs.on_health_update(0.0, 10).is_some());
        assert!(obs.on_health_update(0.0, 20).is_none());
        assert!(obs.observe(&dead(), 50).is_none());
    }

    #[test]
    fn reset_restores_alive_assumption() {
        let mut obs = LifeObserver::new();
        obs.observe(&dead(), 0);
        assert!(obs.has_state());
        obs.reset();
        assert!(!obs.has_state());
        assert_eq!(obs.last_health(), None);
    }
}
