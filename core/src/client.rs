//! Boundary between the detector and the game client hosting it.

use ghostwatch_types::{PlayerRef, PlayerState};

/// Why an outgoing report could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("no network handler available")]
    NetworkUnavailable,
    #[error("clipboard unavailable")]
    ClipboardUnavailable,
    #[error("host rejected the message: {0}")]
    Rejected(String),
}

/// Everything the detector needs from the host.
///
/// Queries are cheap snapshots; all methods are called on the host's
/// tick thread.
pub trait GameClient {
    /// The local player, or `None` on menus, loading screens, or after a
    /// disconnect.
    fn player(&self) -> Option<PlayerState>;

    /// Other players within `radius` of the local player.
    fn nearby_players(&self, radius: f64) -> Vec<PlayerRef>;

    fn send_whisper(&mut self, target: &PlayerRef, text: &str) -> Result<(), DeliveryError>;

    fn send_broadcast(&mut self, text: &str) -> Result<(), DeliveryError>;

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), DeliveryError>;

    /// Multi-line on-screen notice, shown only to the local player.
    fn show_banner(&mut self, lines: &[String]);

    /// Single local status line (mode changes, reminders).
    fn show_status(&mut self, text: &str);
}
