use ghostwatch_types::formatting::{
    UNTIMED_GHOST_MESSAGE, format_ghost_message, format_whisper_command,
};
use ghostwatch_types::{DetectorConfig, PlayerRef};

use crate::classifier::Verdict;

/// Who receives the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    Whisper(PlayerRef),
    Broadcast,
}

/// A formatted report ready for either delivery mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMessage {
    /// Text other players read.
    pub public: String,
    pub recipient: Recipient,
}

impl ReportMessage {
    pub fn new(public: String, recipient: Recipient) -> Self {
        Self { public, recipient }
    }

    /// The full chat command, as the user would type it.
    pub fn command(&self) -> String {
        match &self.recipient {
            Recipient::Whisper(target) => format_whisper_command(&target.name, &self.public),
            Recipient::Broadcast => self.public.clone(),
        }
    }
}

/// Public wording for a verdict.
///
/// Spectator deaths and long holds are reported without timing: past the
/// display cutoff the number does not tell a ghost apart from a normal
/// swap.
pub fn format_public_message(verdict: &Verdict, config: &DetectorConfig) -> String {
    if !verdict.is_timed() {
        return UNTIMED_GHOST_MESSAGE.to_string();
    }

    let show_timing = !verdict.spectator_transition
        && verdict.held_duration_millis <= config.timing_display_max_ms;
    let timing = show_timing.then_some((verdict.held_duration_millis, verdict.ticks_held));
    format_ghost_message(verdict.hand, timing)
}

/// Exactly one nearby player gets a whisper; anything else is a broadcast.
pub fn resolve_recipient(nearby: Vec<PlayerRef>, self_name: Option<&str>) -> Recipient {
    let mut others: Vec<PlayerRef> = nearby
        .into_iter()
        .filter(|p| self_name.is_none_or(|me| !p.name.eq_ignore_ascii_case(me)))
        .collect();

    if others.len() == 1 {
        Recipient::Whisper(others.remove(0))
    } else {
        Recipient::Broadcast
    }
}
