//! Test double for [`GameClient`].

use ghostwatch_types::{HandItem, PlayerRef, PlayerState};

use crate::client::{DeliveryError, GameClient};

/// Scriptable host that records everything the detector sends.
#[derive(Debug)]
pub struct RecordingClient {
    pub player: Option<PlayerState>,
    pub nearby: Vec<PlayerRef>,
    pub network_up: bool,
    pub clipboard_up: bool,
    pub whispers: Vec<(String, String)>,
    pub broadcasts: Vec<String>,
    pub clipboard: Vec<String>,
    pub banners: Vec<Vec<String>>,
    pub statuses: Vec<String>,
}

impl Default for RecordingClient {
    fn default() -> Self {
        Self {
            player: Some(PlayerState {
                name: "Steve".to_string(),
                empty_main_slots: 20,
                ..Default::default()
            }),
            nearby: Vec::new(),
            network_up: true,
            clipboard_up: true,
            whispers: Vec::new(),
            broadcasts: Vec::new(),
            clipboard: Vec::new(),
            banners: Vec::new(),
            statuses: Vec::new(),
        }
    }
}

impl RecordingClient {
    pub fn with_nearby(names: &[&str]) -> Self {
        Self {
            nearby: names.iter().map(|n| PlayerRef::new(*n)).collect(),
            ..Default::default()
        }
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        self.player.get_or_insert_with(PlayerState::default)
    }

    pub fn hold_totem(&mut self, off_hand: bool) {
        let player = self.player_mut();
        if off_hand {
            player.off_hand = HandItem::Totem;
        } else {
            player.main_hand = HandItem::Totem;
        }
    }

    pub fn drop_totems(&mut self) {
        let player = self.player_mut();
        player.main_hand = HandItem::Empty;
        player.off_hand = HandItem::Empty;
    }

    pub fn kill(&mut self) {
        let player = self.player_mut();
        player.health = 0.0;
        player.is_dead = true;
    }

    /// Number of reports that reached any channel.
    pub fn report_count(&self) -> usize {
        self.whispers.len() + self.broadcasts.len() + self.banners.len()
    }
}

impl GameClient for RecordingClient {
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
        self.whispers.push((target.name.clone(), text.to_string()));
        Ok(())
    }

    fn send_broadcast(&mut self, text: &str) -> Result<(), DeliveryError> {
        if !self.network_up {
            return Err(DeliveryError::NetworkUnavailable);
        }
        self.broadcasts.push(text.to_string());
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError> {
        if !self.clipboard_up {
            return Err(DeliveryError::ClipboardUnavailable);
        }
        self.clipboard.push(text.to_string());
        Ok(())
    }

    fn show_banner(&mut self, lines: &[String]) {
        self.banners.push(lines.to_vec());
    }

    fn show_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }
}
