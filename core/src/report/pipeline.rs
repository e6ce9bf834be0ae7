use ghostwatch_types::formatting::{banner_rule, format_held};
use ghostwatch_types::{DeliveryMode, DetectorConfig};

use super::message::{Recipient, ReportMessage, format_public_message, resolve_recipient};
use crate::classifier::Verdict;
use crate::client::{DeliveryError, GameClient};
use crate::scheduler::{ScheduledTask, Scheduler};

pub const REMINDER_TEXT: &str = "[Ghost Detector] Do /gd macro for chat macro mode or /gd clipboard for clipboard mode (check your server's rules!)";

const BANNER_WIDTH: usize = 50;

/// What happened to one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Macro mode: the message went out over the network.
    Sent(Recipient),
    /// Clipboard mode: the banner was shown; `copied` is false if the
    /// clipboard refused the text.
    Copied { command: String, copied: bool },
    /// Nothing left the client. The verdict is still recorded.
    Failed(DeliveryError),
}

/// Owns the reminder flag; everything else is per-report.
#[derive(Debug, Default)]
pub struct ReportPipeline {
    reminder_scheduled: bool,
}

impl ReportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Format, address, and deliver one verdict. Never fails outward.
    pub fn report<G: GameClient + ?Sized>(
        &mut self,
        verdict: &Verdict,
        mode: DeliveryMode,
        client: &mut G,
        self_name: Option<&str>,
        config: &DetectorConfig,
        scheduler: &mut Scheduler,
        now_nanos: u64,
    ) -> DeliveryOutcome {
        let public = format_public_message(verdict, config);
        let nearby = client.nearby_players(config.nearby_radius);
        let nearby_count = nearby.len();
        let recipient = resolve_recipient(nearby, self_name);

        match &recipient {
            Recipient::Whisper(target) => {
                tracing::info!(nearby = nearby_count, target = %target.name, "Prepared private report")
            }
            Recipient::Broadcast => {
                tracing::info!(nearby = nearby_count, "Prepared public report")
            }
        }

        let message = ReportMessage::new(public, recipient);
        match mode {
            DeliveryMode::Macro => send_macro(client, message),
            DeliveryMode::Clipboard => {
                self.send_clipboard(client, verdict, message, config, scheduler, now_nanos)
            }
        }
    }

    fn send_clipboard<G: GameClient + ?Sized>(
        &mut self,
        client: &mut G,
        verdict: &Verdict,
        message: ReportMessage,
        config: &DetectorConfig,
        scheduler: &mut Scheduler,
        now_nanos: u64,
    ) -> DeliveryOutcome {
        let command = message.command();
        let copied = match client.copy_to_clipboard(&command) {
            Ok(()) => {
                tracing::info!(%command, "Report copied to clipboard");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to copy report to clipboard");
                false
            }
        };

        client.show_banner(&banner_lines(verdict, &command, copied));

        if !self.reminder_scheduled {
            let fire_at = now_nanos.saturating_add(config.reminder_delay_nanos());
            scheduler.schedule(fire_at, ScheduledTask::ModeReminder);
            self.reminder_scheduled = true;
        }

        DeliveryOutcome::Copied { command, copied }
    }

    pub fn reminder_scheduled(&self) -> bool {
        self.reminder_scheduled
    }

    /// Called when the scheduled reminder runs.
    pub fn reminder_fired(&mut self) {
        self.reminder_scheduled = false;
    }
}

fn send_macro<G: GameClient + ?Sized>(client: &mut G, message: ReportMessage) -> DeliveryOutcome {
    let result = match &message.recipient {
        Recipient::Whisper(target) => client.send_whisper(target, &message.public),
        Recipient::Broadcast => client.send_broadcast(&message.public),
    };

    match result {
        Ok(()) => {
            tracing::info!(command = %message.command(), "Report sent via macro mode");
            DeliveryOutcome::Sent(message.recipient)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Ghost detected but the report could not be sent");
            DeliveryOutcome::Failed(e)
        }
    }
}

fn banner_lines(verdict: &Verdict, command: &str, copied: bool) -> Vec<String> {
    let rule = banner_rule(BANNER_WIDTH);
    let mut lines = vec![
        rule.clone(),
        "GHOST TOTEM DETECTED!".to_string(),
        rule.clone(),
        format!("Hand: {}", verdict.hand),
        format!(
            "Duration: {}",
            format_held(verdict.held_duration_millis, verdict.ticks_held)
        ),
        rule.clone(),
    ];
    if copied {
        lines.push("Command copied to clipboard!".to_string());
        lines.push("Paste it in chat to report the ghost:".to_string());
    } else {
        lines.push("Clipboard unavailable, type this in chat to report the ghost:".to_string());
    }
    lines.push(command.to_string());
    lines.push(rule);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Confidence, VerdictKind};
    use crate::events::DeathSource;
    use crate::testing::RecordingClient;
    use ghostwatch_types::{Hand, PlayerRef};

    const MS: u64 = 1_000_000;

    fn verdict() -> Verdict {
        Verdict {
            kind: VerdictKind::GhostTotem,
            confidence: Confidence::Timed,
            source: DeathSource::HealthDrop,
            hand: Hand::MainHand,
            held_duration_millis: 48,
            ticks_held: 1,
            spectator_transition: false,
            detected_at_nanos: 0,
            equip_tick: Some(10),
            death_tick: 11,
        }
    }

    fn run(
        pipeline: &mut ReportPipeline,
        client: &mut RecordingClient,
        mode: DeliveryMode,
        scheduler: &mut Scheduler,
    ) -> DeliveryOutcome {
        pipeline.report(
            &verdict(),
            mode,
            client,
            Some("Steve"),
            &DetectorConfig::default(),
            scheduler,
            1_000 * MS,
        )
    }

    #[test]
    fn macro_whispers_single_neighbour() {
        let mut client = RecordingClient::with_nearby(&["Alex"]);
        let mut scheduler = Scheduler::new();
        let outcome = run(&mut ReportPipeline::new(), &mut client, DeliveryMode::Macro, &mut scheduler);

        assert_eq!(outcome, DeliveryOutcome::Sent(Recipient::Whisper(PlayerRef::new("Alex"))));
        assert_eq!(
            client.whispers,
            vec![(
                "Alex".to_string(),
                "<Mainhand Ghost Detected> totem held for 48ms (1 ticks)".to_string()
            )]
        );
        assert!(client.broadcasts.is_empty());
        assert!(client.clipboard.is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn macro_broadcasts_to_crowd() {
        let mut client = RecordingClient::with_nearby(&["Alex", "Notch"]);
        let mut scheduler = Scheduler::new();
        run(&mut ReportPipeline::new(), &mut client, DeliveryMode::Macro, &mut scheduler);
        assert_eq!(client.broadcasts.len(), 1);
        assert!(client.whispers.is_empty());
    }

    #[test]
    fn macro_without_network_fails_quietly() {
        let mut client = RecordingClient::with_nearby(&[]);
        client.network_up = false;
        let mut scheduler = Scheduler::new();
        let outcome = run(&mut ReportPipeline::new(), &mut client, DeliveryMode::Macro, &mut scheduler);

        assert_eq!(outcome, DeliveryOutcome::Failed(DeliveryError::NetworkUnavailable));
        assert!(client.banners.is_empty());
        assert!(client.clipboard.is_empty());
    }

    #[test]
    fn clipboard_copies_command_and_schedules_one_reminder() {
        let mut client = RecordingClient::with_nearby(&["Alex"]);
        let mut scheduler = Scheduler::new();
        let mut pipeline = ReportPipeline::new();

        let outcome = run(&mut pipeline, &mut client, DeliveryMode::Clipboard, &mut scheduler);
        let expected = "/w Alex <Mainhand Ghost Detected> totem held for 48ms (1 ticks)";
        assert_eq!(
            outcome,
            DeliveryOutcome::Copied {
                command: expected.to_string(),
                copied: true
            }
        );
        assert_eq!(client.clipboard, vec![expected.to_string()]);
        assert_eq!(client.banners.len(), 1);
        assert!(client.banners[0].iter().any(|l| l == expected));
        assert!(client.whispers.is_empty());

        assert_eq!(scheduler.next_fire_at(), Some(4_000 * MS));
        assert!(pipeline.reminder_scheduled());

        run(&mut pipeline, &mut client, DeliveryMode::Clipboard, &mut scheduler);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(client.banners.len(), 2);
    }

    #[test]
    fn clipboard_failure_still_shows_banner() {
        let mut client = RecordingClient::with_nearby(&[]);
        client.clipboard_up = false;
        let mut scheduler = Scheduler::new();
        let outcome = run(&mut ReportPipeline::new(), &mut client, DeliveryMode::Clipboard, &mut scheduler);

        assert!(matches!(outcome, DeliveryOutcome::Copied { copied: false, .. }));
        assert_eq!(client.banners.len(), 1);
        assert!(client.banners[0].iter().any(|l| l.starts_with("Clipboard unavailable")));
    }
}
