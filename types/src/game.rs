use std::fmt;

use serde::{Deserialize, Serialize};

/// Which hand held the revive item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    MainHand,
    OffHand,
    #[default]
    Unknown,
}

impl Hand {
    /// Label used in outgoing chat reports.
    pub fn label(self) -> &'static str {
        match self {
            Hand::MainHand => "Mainhand",
            Hand::OffHand => "Offhand",
            Hand::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Game mode as reported by the client's interaction manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// Coarse classification of the stack in one hand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandItem {
    #[default]
    Empty,
    Totem,
    Other,
}

impl HandItem {
    pub fn is_totem(self) -> bool {
        self == HandItem::Totem
    }

    pub fn is_empty(self) -> bool {
        self == HandItem::Empty
    }
}

/// Another player visible to the local client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub name: String,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Snapshot of the local player the host hands to the engine.
///
/// `empty_main_slots` counts empty slots in the 36-slot main inventory
/// (hotbar included, armor and off hand excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub name: String,
    pub health: f32,
    pub is_dead: bool,
    pub game_mode: Option<GameMode>,
    pub selected_slot: u8,
    pub main_hand: HandItem,
    pub off_hand: HandItem,
    pub empty_main_slots: u32,
    /// Revive items in the main inventory outside the selected slot.
    pub totems_in_inventory: u32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            name: String::new(),
            health: 20.0,
            is_dead: false,
            game_mode: Some(GameMode::Survival),
            selected_slot: 0,
            main_hand: HandItem::Empty,
            off_hand: HandItem::Empty,
            empty_main_slots: 36,
            totems_in_inventory: 0,
        }
    }
}

impl PlayerState {
    pub fn is_alive(&self) -> bool {
        !self.is_dead && self.health > 0.0
    }

    pub fn is_spectator(&self) -> bool {
        self.game_mode == Some(GameMode::Spectator)
    }

    pub fn is_holding_totem(&self) -> bool {
        self.main_hand.is_totem() || self.off_hand.is_totem()
    }

    /// Hand currently holding the revive item, main hand first.
    pub fn totem_hand(&self) -> Hand {
        if self.main_hand.is_totem() {
            Hand::MainHand
        } else if self.off_hand.is_totem() {
            Hand::OffHand
        } else {
            Hand::Unknown
        }
    }

    pub fn any_hand_empty(&self) -> bool {
        self.main_hand.is_empty() || self.off_hand.is_empty()
    }
}

/// How a verdict reaches other players.
///
/// The two modes are mutually exclusive; the enum makes "both on" and
/// "both off" unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Send the whisper/broadcast over the network without user action.
    Macro,
    /// Copy the command to the clipboard and ask the user to paste it.
    #[default]
    Clipboard,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Macro => f.write_str("macro"),
            DeliveryMode::Clipboard => f.write_str("clipboard"),
        }
    }
}
