//! A host that lives entirely in memory.
//!
//! The replay runner and the interactive shell both mutate the player
//! snapshot directly and read back whatever the detector tried to send.

use ghostwatch_core::{DeliveryError, GameClient};
use ghostwatch_types::{GameMode, HandItem, PlayerRef, PlayerState};

/// Something the detector pushed out to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutput {
    Whisper { to: String, text: String },
    Broadcast(String),
    Clipboard(String),
    Banner(Vec<String>),
    Status(String),
}

impl HostOutput {
    /// One line per output; banners keep their own line breaks.
    pub fn render(&self) -> String {
        match self {
            HostOutput::Whisper { to, text } => format!("[whisper -> {to}] {text}"),
            HostOutput::Broadcast(text) => format!("[chat] {text}"),
            HostOutput::Clipboard(text) => format!("[clipboard] {text}"),
            HostOutput::Banner(lines) => lines.join("\n"),
            HostOutput::Status(text) => format!("[status] {text}"),
        }
    }
}

#[derive(Debug)]
pub struct ScriptedClient {
    pub player: Option<PlayerState>,
    pub nearby: Vec<PlayerRef>,
    pub network_up: bool,
    pub clipboard_up: bool,
    outputs: Vec<HostOutput>,
}

impl ScriptedClient {
    pub fn new(name: &str) -> Self {
        Self {
            player: Some(PlayerState {
                name: name.to_string(),
                ..Default::default()
            }),
            nearby: Vec::new(),
            network_up: true,
            clipboard_up: true,
            outputs: Vec::new(),
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerState> {
        self.player.as_mut()
    }

    pub fn set_nearby<S: AsRef<str>>(&mut self, names: &[S]) {
        self.nearby = names.iter().map(|n| PlayerRef::new(n.as_ref())).collect();
    }

    pub fn hold_totem(&mut self, off_hand: bool) {
        if let Some(player) = self.player_mut() {
            if off_hand {
                player.off_hand = HandItem::Totem;
            } else {
                player.main_hand = HandItem::Totem;
            }
        }
    }

    pub fn drop_totems(&mut self) {
        if let Some(player) = self.player_mut() {
            player.main_hand = HandItem::Empty;
            player.off_hand = HandItem::Empty;
        }
    }

    /// Server-side inventory wipe: hands and all `slots` main slots emptied.
    pub fn wipe_inventory(&mut self, slots: u32) {
        if let Some(player) = self.player_mut() {
            player.main_hand = HandItem::Empty;
            player.off_hand = HandItem::Empty;
            player.empty_main_slots = slots;
            player.totems_in_inventory = 0;
        }
    }

    pub fn kill(&mut self) {
        if let Some(player) = self.player_mut() {
            player.health = 0.0;
            player.is_dead = true;
        }
    }

    pub fn respawn(&mut self) {
        if let Some(player) = self.player_mut() {
            player.health = 20.0;
            player.is_dead = false;
            player.game_mode = Some(GameMode::Survival);
        }
    }

    pub fn spectate(&mut self) {
        if let Some(player) = self.player_mut() {
            player.game_mode = Some(GameMode::Spectator);
        }
    }

    /// Hand back everything sent since the last call.
    pub fn drain_outputs(&mut self) -> Vec<HostOutput> {
        std::mem::take(&mut self.outputs)
    }
}

impl GameClient for ScriptedClient {
    fn player(&self) -> Option<PlayerState> {
        self.player.clone()
    }

    fn nearby_players(&self, _radius: f64) -> Vec<PlayerRef> {
        self.nearby.clone()
    }

    fn send_whisper(&mut self, target: &PlayerRef, text: &str) -> Result<(), DeliveryError> {
        if !self.network_up {
            return Err(DeliveryError::NetworkUnavailable);
        }
        self.outputs.push(HostOutput::Whisper {
            to: target.name.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    fn send_broadcast(&mut self, text: &str) -> Result<(), DeliveryError> {
        if !self.network_up {
            return Err(DeliveryError::NetworkUnavailable);
        }
        self.outputs.push(HostOutput::Broadcast(text.to_string()));
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError> {
        if !self.clipboard_up {
            return Err(DeliveryError::ClipboardUnavailable);
        }
        self.outputs.push(HostOutput::Clipboard(text.to_string()));
        Ok(())
    }

    fn show_banner(&mut self, lines: &[String]) {
        self.outputs.push(HostOutput::Banner(lines.to_vec()));
    }

    fn show_status(&mut self, text: &str) {
        self.outputs.push(HostOutput::Status(text.to_string()));
    }
}
