//! Reporting pipeline: verdict → message → recipient → delivery.

mod message;
mod pipeline;

pub use message::{Recipient, ReportMessage, format_public_message, resolve_recipient};
pub use pipeline::{DeliveryOutcome, ReportPipeline, REMINDER_TEXT};
