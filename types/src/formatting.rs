//! Centralized report text formatting.
//!
//! Every string that leaves the detector as chat goes through this
//! module so the macro path and the clipboard path always send exactly
//! the same text.

use crate::Hand;

/// Header used by the untimed (no tracked totem) verdict.
pub const UNTIMED_GHOST_MESSAGE: &str = "<Ghost Detected>";

/// Format the hold duration as shown in reports and banners.
///
/// # Examples
/// ```
/// use ghostwatch_types::formatting::format_held;
/// assert_eq!(format_held(151, 3), "151ms (3 ticks)");
/// assert_eq!(format_held(0, 0), "0ms (0 ticks)");
/// ```
pub fn format_held(held_ms: i64, ticks: i64) -> String {
    format!("{}ms ({} ticks)", held_ms, ticks)
}

/// Format the public report for a timed verdict.
///
/// Timing is appended only when `timing` is `Some`; callers decide
/// whether the hold time is worth showing.
///
/// # Examples
/// ```
/// use ghostwatch_types::Hand;
/// use ghostwatch_types::formatting::format_ghost_message;
/// assert_eq!(format_ghost_message(Hand::OffHand, None), "<Offhand Ghost Detected>");
/// assert_eq!(
///     format_ghost_message(Hand::MainHand, Some((48, 1))),
///     "<Mainhand Ghost Detected> totem held for 48ms (1 ticks)"
/// );
/// ```
pub fn format_ghost_message(hand: Hand, timing: Option<(i64, i64)>) -> String {
    match timing {
        Some((held_ms, ticks)) => format!(
            "<{} Ghost Detected> totem held for {}",
            hand.label(),
            format_held(held_ms, ticks)
        ),
        None => format!("<{} Ghost Detected>", hand.label()),
    }
}

/// Format the chat command a user would type for a whisper.
///
/// # Examples
/// ```
/// use ghostwatch_types::formatting::format_whisper_command;
/// assert_eq!(format_whisper_command("Alex", "<Ghost Detected>"), "/w Alex <Ghost Detected>");
/// ```
pub fn format_whisper_command(target: &str, message: &str) -> String {
    format!("/w {} {}", target, message)
}

/// A horizontal rule for banners.
pub fn banner_rule(width: usize) -> String {
    "=".repeat(width)
}

/// Format a duration in milliseconds as `HH:MM:SS.mmm` time-of-day.
///
/// # Examples
/// ```
/// use ghostwatch_types::formatting::format_time_of_day;
/// assert_eq!(format_time_of_day(0), "00:00:00.000");
/// assert_eq!(format_time_of_day(5_151), "00:00:05.151");
/// assert_eq!(format_time_of_day(3_723_004), "01:02:03.004");
/// ```
pub fn format_time_of_day(millis: u64) -> String {
    let ms = millis % 1000;
    let total_secs = millis / 1000;
    let h = (total_secs / 3600) % 24;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}
