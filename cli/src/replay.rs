//! Deterministic scenario replay on a manual clock.

use ghostwatch_core::{Diagnostics, GhostTotemDetector, ManualClock, Verdict};
use ghostwatch_types::{DetectorConfig, PlayerState};
use ghostwatch_types::formatting::format_time_of_day;

use crate::scenario::{Action, Scenario, Step};
use crate::scripted::{HostOutput, ScriptedClient};

/// One host output, stamped with the replay clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayLine {
    pub at_ms: u64,
    pub output: HostOutput,
}

impl ReplayLine {
    pub fn render(&self) -> String {
        format!("{} {}", format_time_of_day(self.at_ms), self.output.render())
    }
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub verdicts: Vec<Verdict>,
    pub lines: Vec<ReplayLine>,
    pub diagnostics: Diagnostics,
    pub ticks: u64,
}

struct Replay {
    detector: GhostTotemDetector<ManualClock>,
    client: ScriptedClient,
    /// Player snapshot kept aside while the player context is gone.
    parked: Option<PlayerState>,
    verdicts: Vec<Verdict>,
    lines: Vec<ReplayLine>,
}

pub fn run(scenario: &Scenario, config: DetectorConfig) -> ReplayReport {
    let mut client = ScriptedClient::new(&scenario.player.name);
    client.player = Some(scenario.player.clone());
    client.set_nearby(&scenario.nearby);

    let mut replay = Replay {
        detector: GhostTotemDetector::with_clock(config, ManualClock::default()),
        client,
        parked: None,
        verdicts: Vec::new(),
        lines: Vec::new(),
    };

    tracing::info!(
        player = %scenario.player.name,
        steps = scenario.steps.len(),
        "Starting replay"
    );
    for step in &scenario.steps {
        replay.apply(step);
    }

    ReplayReport {
        ticks: replay.detector.tick_count(),
        diagnostics: replay.detector.diagnostics().clone(),
        verdicts: replay.verdicts,
        lines: replay.lines,
    }
}

impl Replay {
    fn apply(&mut self, step: &Step) {
        if let Some(at) = step.at_ms {
            self.detector.clock().set_millis(at);
        }

        let verdict = match &step.action {
            Action::Tick { count } => {
                let tick_millis = self.detector.config().tick_millis;
                for i in 0..*count {
                    if i > 0 || step.at_ms.is_none() {
                        self.detector.clock().advance_millis(tick_millis);
                    }
                    let verdict = self.detector.tick(&mut self.client);
                    self.record(verdict);
                }
                return;
            }
            Action::Chat { line } => self.detector.on_chat_line(&mut self.client, line),
            Action::Health { value } => {
                if let Some(player) = self.client.player_mut() {
                    player.health = *value;
                }
                self.detector.on_health_update(&mut self.client, *value)
            }
            Action::Hold { off_hand } => {
                self.client.hold_totem(*off_hand);
                None
            }
            Action::Drop => {
                self.client.drop_totems();
                None
            }
            Action::Wipe => {
                let slots = self.detector.config().main_inventory_slots;
                self.client.wipe_inventory(slots);
                None
            }
            Action::Kill => {
                self.client.kill();
                None
            }
            Action::Respawn => {
                self.client.respawn();
                None
            }
            Action::Spectate => {
                self.client.spectate();
                None
            }
            Action::Pop => {
                self.detector.on_legitimate_revive_pop();
                None
            }
            Action::Mode { mode } => {
                self.detector.set_delivery_mode(&mut self.client, *mode);
                None
            }
            Action::ToggleMacro => {
                self.detector.toggle_macro_mode(&mut self.client);
                None
            }
            Action::ToggleClipboard => {
                self.detector.toggle_clipboard_mode(&mut self.client);
                None
            }
            Action::Nearby { names } => {
                self.client.set_nearby(names);
                None
            }
            Action::Leave => {
                if let Some(player) = self.client.player.take() {
                    self.parked = Some(player);
                }
                None
            }
            Action::Rejoin => {
                if let Some(player) = self.parked.take() {
                    self.client.player = Some(player);
                }
                None
            }
            Action::Network { up } => {
                self.client.network_up = *up;
                None
            }
            Action::Clipboard { up } => {
                self.client.clipboard_up = *up;
                None
            }
        };
        self.record(verdict);
    }

    fn record(&mut self, verdict: Option<Verdict>) {
        let at_ms = self.detector.clock().elapsed_millis();
        if let Some(verdict) = verdict {
            self.verdicts.push(verdict);
        }
        self.lines.extend(
            self.client
                .drain_outputs()
                .into_iter()
                .map(|output| ReplayLine { at_ms, output }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostwatch_core::{DeathSource, REMINDER_TEXT};
    use ghostwatch_types::Hand;

    fn replay(text: &str) -> ReplayReport {
        let scenario = Scenario::parse(text).unwrap();
        let config = scenario.detector_config(&DetectorConfig::default()).unwrap();
        run(&scenario, config)
    }

    #[test]
    fn test_timed_ghost_replay() {
        let report = replay(
            r#"
            [player]
            name = "Steve"

            [[step]]
            at_ms = 50
            action = "tick"
            count = 99

            [[step]]
            action = "hold"
            off_hand = true

            [[step]]
            at_ms = 5000
            action = "tick"
            count = 3

            [[step]]
            action = "kill"

            [[step]]
            at_ms = 5151
            action = "tick"
            "#,
        );

        assert_eq!(report.ticks, 103);
        assert_eq!(report.verdicts.len(), 1);
        let verdict = &report.verdicts[0];
        assert_eq!(verdict.hand, Hand::OffHand);
        assert_eq!(verdict.ticks_held, 3);
        assert_eq!(verdict.held_duration_millis, 151);

        let expected = ReplayLine {
            at_ms: 5151,
            output: HostOutput::Clipboard(
                "<Offhand Ghost Detected> totem held for 151ms (3 ticks)".to_string(),
            ),
        };
        assert_eq!(report.lines[0], expected);
        assert_eq!(
            expected.render(),
            "00:00:05.151 [clipboard] <Offhand Ghost Detected> totem held for 151ms (3 ticks)"
        );
        assert!(matches!(report.lines[1].output, HostOutput::Banner(_)));
    }

    #[test]
    fn test_macro_whisper_and_dedup() {
        let report = replay(
            r#"
            nearby = ["Alex"]

            [player]
            name = "Steve"
            main_hand = "totem"

            [config]
            default_mode = "macro"

            [[step]]
            action = "tick"

            [[step]]
            action = "chat"
            line = "Steve was killed by Alex"

            [[step]]
            action = "health"
            value = 0.0

            [[step]]
            action = "spectate"

            [[step]]
            action = "tick"
            "#,
        );

        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verdicts[0].source, DeathSource::ChatDeathMessage);
        assert_eq!(
            report.lines,
            vec![ReplayLine {
                at_ms: 50,
                output: HostOutput::Whisper {
                    to: "Alex".to_string(),
                    text: "<Mainhand Ghost Detected> totem held for 0ms (0 ticks)".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_reminder_follows_clipboard_report() {
        let report = replay(
            r#"
            [player]
            name = "Steve"

            [[step]]
            action = "tick"

            [[step]]
            action = "chat"
            line = "steve was killed"

            [[step]]
            at_ms = 3100
            action = "tick"
            count = 2
            "#,
        );

        assert_eq!(report.verdicts.len(), 1);
        assert!(!report.verdicts[0].is_timed());
        let status: Vec<&ReplayLine> = report
            .lines
            .iter()
            .filter(|l| matches!(l.output, HostOutput::Status(_)))
            .collect();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].at_ms, 3100);
        assert_eq!(status[0].output, HostOutput::Status(REMINDER_TEXT.to_string()));
    }

    #[test]
    fn test_leave_and_rejoin_resets_tracking() {
        let report = replay(
            r#"
            [player]
            name = "Steve"
            off_hand = "totem"

            [[step]]
            action = "tick"

            [[step]]
            action = "leave"

            [[step]]
            action = "tick"

            [[step]]
            action = "rejoin"

            [[step]]
            action = "kill"

            [[step]]
            action = "drop"

            [[step]]
            action = "tick"

            [[step]]
            action = "toggle_macro"
            "#,
        );

        assert!(report.verdicts.is_empty());
        // rejoining dead counts as an ordinary death, nothing is reported
        assert_eq!(report.diagnostics.ordinary_deaths, 1);
        assert_eq!(
            report.lines.last().map(|l| &l.output),
            Some(&HostOutput::Status(
                "[Ghost Detector] Chat macro mode ENABLED".to_string()
            ))
        );
    }
}
