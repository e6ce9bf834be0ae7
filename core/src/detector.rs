//! The detector context.
//!
//! One `GhostTotemDetector` owns every piece of mutable state: totem
//! session, life observer, dedup window, delivery mode, scheduled tasks,
//! and diagnostics. The host calls its entry points from a single thread
//! (or through [`crate::queue`]), so nothing here locks.
//!
//! Per tick the order is fixed: due tasks, then death detection, then totem
//! bookkeeping. A death seen this tick is classified against the session
//! as it stood at the moment of death.

use ghostwatch_types::{DeliveryMode, DetectorConfig, PlayerState};

use crate::classifier::{Verdict, VerdictKind, classify};
use crate::client::GameClient;
use crate::clock::{Clock, SystemClock};
use crate::events::{DeathAggregator, DeathSignal, DeathSource, LifeObserver, is_self_death};
use crate::report::{DeliveryOutcome, REMINDER_TEXT, ReportPipeline};
use crate::scheduler::{ScheduledTask, Scheduler};
use crate::state::{DetectorState, Diagnostics};
use crate::tracking::{InventoryClearCheck, TotemTracker, TotemTransition, totem_warning_active};

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

pub struct GhostTotemDetector<C: Clock = SystemClock> {
    config: DetectorConfig,
    clock: C,
    tick: u64,
    mode: DeliveryMode,
    tracker: TotemTracker,
    life: LifeObserver,
    aggregator: DeathAggregator,
    pipeline: ReportPipeline,
    scheduler: Scheduler,
    state: DetectorState,
    diagnostics: Diagnostics,
}

impl GhostTotemDetector<SystemClock> {
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> GhostTotemDetector<C> {
    pub fn with_clock(config: DetectorConfig, clock: C) -> Self {
        Self {
            mode: config.default_mode,
            aggregator: DeathAggregator::new(config.dedup_window_nanos()),
            config,
            clock,
            tick: 0,
            tracker: TotemTracker::new(),
            life: LifeObserver::new(),
            pipeline: ReportPipeline::new(),
            scheduler: Scheduler::new(),
            state: DetectorState::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.mode
    }

    pub fn tracker(&self) -> &TotemTracker {
        &self.tracker
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Player carries a revive item but has none in hand.
    pub fn warning_active(&self) -> bool {
        self.state.warning_active
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    // ─── Host entry points ──────────────────────────────────────────────────

    /// Advance one game tick.
    pub fn tick<G: GameClient + ?Sized>(&mut self, client: &mut G) -> Option<Verdict> {
        self.tick += 1;
        let now = self.clock.monotonic_nanos();

        let player = client.player();
        self.run_due_tasks(client, now, player.is_some());

        let Some(player) = player else {
            self.reset_context();
            return None;
        };

        let mut verdict = None;
        if let Some(signal) = self.life.observe(&player, now) {
            verdict = self.process_signal(client, signal, Some(&player));
        }

        self.track_slot(&player);

        let transition = self.tracker.observe(
            player.is_holding_totem(),
            player.totem_hand(),
            now,
            self.tick,
        );
        match transition {
            Some(TotemTransition::Equipped(session)) => {
                tracing::info!(
                    hand = %session.hand,
                    slot = player.selected_slot,
                    tick = session.equip_tick,
                    time = %self.clock.wall_time().format(TIME_FORMAT),
                    "Totem equipped"
                );
            }
            Some(TotemTransition::Unequipped { held, .. }) => {
                tracing::info!(
                    held_ms = held.millis,
                    ticks = held.ticks,
                    "Totem unequipped"
                );
                if let Some(v) = self.check_inventory_clear(client, &player, now) {
                    verdict = Some(v);
                }
                self.tracker.clear();
            }
            None => {}
        }

        self.update_warning(&player);
        verdict
    }

    /// Incoming chat line. Only the local player's death broadcast matters.
    pub fn on_chat_line<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        line: &str,
    ) -> Option<Verdict> {
        let player = client.player()?;
        if !is_self_death(line, &player.name) {
            return None;
        }

        let now = self.clock.monotonic_nanos();
        self.state.last_self_death_chat_nanos = Some(now);
        tracing::info!(%line, "Death detected via chat message");

        let signal = DeathSignal::new(DeathSource::ChatDeathMessage, now);
        self.process_signal(client, signal, Some(&player))
    }

    /// Push-model health callback, fired by the host when health is set.
    pub fn on_health_update<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        health: f32,
    ) -> Option<Verdict> {
        let now = self.clock.monotonic_nanos();
        let signal = self.life.on_health_update(health, now)?;
        // The host fires this before it stores the new value.
        let mut player = client.player();
        if let Some(p) = player.as_mut() {
            p.health = health;
        }
        self.process_signal(client, signal, player.as_ref())
    }

    /// Server confirmed a real revive for the local player.
    pub fn on_legitimate_revive_pop(&mut self) {
        self.state.last_totem_pop_nanos = Some(self.clock.monotonic_nanos());
        tracing::debug!("Local player totem pop detected via status packet");
    }

    /// Feed an externally produced death signal through the aggregator.
    pub fn handle_signal<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        signal: DeathSignal,
    ) -> Option<Verdict> {
        let player = client.player();
        self.process_signal(client, signal, player.as_ref())
    }

    // ─── Delivery mode ──────────────────────────────────────────────────────

    pub fn set_delivery_mode<G: GameClient + ?Sized>(&mut self, client: &mut G, mode: DeliveryMode) {
        self.mode = mode;
        let text = match mode {
            DeliveryMode::Macro => "[Ghost Detector] Chat macro mode ENABLED",
            DeliveryMode::Clipboard => "[Ghost Detector] Clipboard mode ENABLED",
        };
        self.announce(client, text);
        tracing::info!(%mode, "Delivery mode set");
    }

    /// Flip macro mode; clipboard mode takes the opposite value.
    pub fn toggle_macro_mode<G: GameClient + ?Sized>(&mut self, client: &mut G) -> DeliveryMode {
        self.mode = match self.mode {
            DeliveryMode::Macro => DeliveryMode::Clipboard,
            DeliveryMode::Clipboard => DeliveryMode::Macro,
        };
        let text = if self.mode == DeliveryMode::Macro {
            "[Ghost Detector] Chat macro mode ENABLED"
        } else {
            "[Ghost Detector] Chat macro mode DISABLED"
        };
        self.announce(client, text);
        tracing::info!(mode = %self.mode, "Macro mode toggled");
        self.mode
    }

    /// Flip clipboard mode; macro mode takes the opposite value.
    pub fn toggle_clipboard_mode<G: GameClient + ?Sized>(&mut self, client: &mut G) -> DeliveryMode {
        self.mode = match self.mode {
            DeliveryMode::Clipboard => DeliveryMode::Macro,
            DeliveryMode::Macro => DeliveryMode::Clipboard,
        };
        let text = if self.mode == DeliveryMode::Clipboard {
            "[Ghost Detector] Clipboard mode ENABLED"
        } else {
            "[Ghost Detector] Clipboard mode DISABLED"
        };
        self.announce(client, text);
        tracing::info!(mode = %self.mode, "Clipboard mode toggled");
        self.mode
    }

    // ─── Internals ──────────────────────────────────────────────────────────

    fn process_signal<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        signal: DeathSignal,
        player: Option<&PlayerState>,
    ) -> Option<Verdict> {
        let event = self.aggregator.accept(signal)?;
        let now = self.clock.monotonic_nanos();
        let session = self.tracker.take_session();
        let verdict = classify(&event, session, player, now, self.tick);

        if verdict.kind == VerdictKind::OrdinaryDeath {
            tracing::info!(source = %event.source(), "Death detected, but no totem was being held");
            self.diagnostics.ordinary_deaths += 1;
            return None;
        }

        self.aggregator.mark_verdict(now);
        self.diagnostics.record_ghost(&verdict, self.clock.wall_time());
        self.log_verdict(&verdict);

        let outcome = self.pipeline.report(
            &verdict,
            self.mode,
            client,
            player.map(|p| p.name.as_str()),
            &self.config,
            &mut self.scheduler,
            now,
        );
        if matches!(outcome, DeliveryOutcome::Failed(_)) {
            self.diagnostics.failed_deliveries += 1;
        }

        Some(verdict)
    }

    fn check_inventory_clear<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        player: &PlayerState,
        now: u64,
    ) -> Option<Verdict> {
        let check = InventoryClearCheck::capture(
            player,
            self.state.millis_since_pop(now),
            self.state.millis_since_self_death_chat(now),
        );
        if !check.is_probable_ghost(&self.config) {
            tracing::debug!("Inventory clear conditions not met");
            return None;
        }

        tracing::info!(
            empty_slots = check.empty_slots,
            "Totem was held when inventory cleared, treating as ghost"
        );
        let signal = DeathSignal::new(DeathSource::InventoryClearHeuristic, now);
        self.process_signal(client, signal, Some(player))
    }

    fn run_due_tasks<G: GameClient + ?Sized>(&mut self, client: &mut G, now: u64, has_player: bool) {
        for task in self.scheduler.drain_due(now) {
            match task {
                ScheduledTask::ModeReminder => {
                    self.pipeline.reminder_fired();
                    if has_player && self.mode == DeliveryMode::Clipboard {
                        client.show_status(REMINDER_TEXT);
                    }
                }
            }
        }
    }

    fn track_slot(&mut self, player: &PlayerState) {
        if self.state.last_selected_slot != Some(player.selected_slot) {
            tracing::debug!(
                from = ?self.state.last_selected_slot,
                to = player.selected_slot,
                main_hand = ?player.main_hand,
                "Selected slot changed"
            );
            self.state.last_selected_slot = Some(player.selected_slot);
        }
    }

    fn update_warning(&mut self, player: &PlayerState) {
        let active = totem_warning_active(player);
        if active != self.state.warning_active {
            tracing::debug!(active, "Totem warning changed");
            self.state.warning_active = active;
        }
    }

    /// Host lost the player (title screen, disconnect).
    fn reset_context(&mut self) {
        let had_state = self.tracker.is_tracking()
            || self.tracker.was_holding()
            || self.life.has_state()
            || self.state.last_selected_slot.is_some();
        if had_state {
            tracing::debug!("Resetting state, player context unavailable");
        }
        self.tracker.reset();
        self.life.reset();
        self.state.reset_player_context();
    }

    fn announce<G: GameClient + ?Sized>(&self, client: &mut G, text: &str) {
        if client.player().is_some() {
            client.show_status(text);
        }
    }

    fn log_verdict(&self, verdict: &Verdict) {
        if !verdict.is_timed() {
            tracing::info!(source = %verdict.source, "Ghost detected with no tracked totem");
            return;
        }

        let tick_ms = i64::try_from(self.config.tick_millis).unwrap_or(i64::MAX);
        let expected_ms = verdict.ticks_held.saturating_mul(tick_ms);
        tracing::info!(
            hand = %verdict.hand,
            source = %verdict.source,
            equip_tick = ?verdict.equip_tick,
            death_tick = verdict.death_tick,
            ticks_held = verdict.ticks_held,
            expected_ms,
            held_ms = verdict.held_duration_millis,
            drift_ms = verdict.held_duration_millis.saturating_sub(expected_ms),
            time = %self.clock.wall_time().format(TIME_FORMAT),
            "GHOST TOTEM DETECTED"
        );
    }
}
