//! Serialized event queue for hosts with real parallelism.
//!
//! Tick, chat, and entity-status callbacks may arrive on different
//! threads. Each one becomes a [`HostEvent`] on a tokio channel; a single
//! task owns the detector and applies events in arrival order, which keeps
//! the detector single-writer.

use ghostwatch_types::DeliveryMode;
use tokio::sync::mpsc;

use crate::classifier::Verdict;
use crate::client::GameClient;
use crate::clock::Clock;
use crate::detector::GhostTotemDetector;

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Tick,
    Chat(String),
    HealthUpdate(f32),
    RevivePop,
    SetMode(DeliveryMode),
}

/// Cloneable handle the host's callbacks push into.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<HostEvent>,
}

impl EventSender {
    pub async fn send(&self, event: HostEvent) -> Result<(), QueueClosed> {
        self.tx.send(event).await.map_err(|_| QueueClosed)
    }

    /// Non-blocking push for callbacks that cannot await.
    pub fn try_send(&self, event: HostEvent) -> Result<(), QueueClosed> {
        self.tx.try_send(event).map_err(|_| QueueClosed)
    }
}

/// The detector side of the queue has shut down or is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("detector event queue unavailable")]
pub struct QueueClosed;

pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<HostEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender { tx }, rx)
}

impl<C: Clock> GhostTotemDetector<C> {
    /// Apply one host event.
    pub fn apply<G: GameClient + ?Sized>(&mut self, client: &mut G, event: HostEvent) -> Option<Verdict> {
        match event {
            HostEvent::Tick => self.tick(client),
            HostEvent::Chat(line) => self.on_chat_line(client, &line),
            HostEvent::HealthUpdate(health) => self.on_health_update(client, health),
            HostEvent::RevivePop => {
                self.on_legitimate_revive_pop();
                None
            }
            HostEvent::SetMode(mode) => {
                self.set_delivery_mode(client, mode);
                None
            }
        }
    }
}

/// Drain the queue until every sender is dropped. Returns all verdicts.
pub async fn run_detector<C: Clock, G: GameClient>(
    detector: &mut GhostTotemDetector<C>,
    client: &mut G,
    mut rx: mpsc::Receiver<HostEvent>,
) -> Vec<Verdict> {
    let mut verdicts = Vec::new();
    while let Some(event) = rx.recv().await {
        if let Some(verdict) = detector.apply(client, event) {
            verdicts.push(verdict);
        }
    }
    tracing::debug!(verdicts = verdicts.len(), "Event queue closed");
    verdicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::testing::RecordingClient;
    use ghostwatch_types::DetectorConfig;

    #[tokio::test]
    async fn events_from_many_producers_are_serialized() {
        let (tx, rx) = channel(64);
        let mut detector =
            GhostTotemDetector::with_clock(DetectorConfig::default(), ManualClock::default());
        let mut client = RecordingClient::with_nearby(&["Alex"]);
        client.hold_totem(true);

        let ticks = tx.clone();
        let chat = tx.clone();
        drop(tx);

        let producer = tokio::spawn(async move {
            ticks.send(HostEvent::Tick).await.unwrap();
            ticks.send(HostEvent::SetMode(DeliveryMode::Macro)).await.unwrap();
            chat.send(HostEvent::Chat("Steve was killed by Alex".to_string()))
                .await
                .unwrap();
            chat.send(HostEvent::Chat("Steve was killed by Alex".to_string()))
                .await
                .unwrap();
        });

        let verdicts = run_detector(&mut detector, &mut client, rx).await;
        producer.await.unwrap();

        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].is_timed());
        assert_eq!(detector.delivery_mode(), DeliveryMode::Macro);
        assert_eq!(client.whispers.len(), 1);
    }

    #[tokio::test]
    async fn send_after_shutdown_reports_closed() {
        let (tx, rx) = channel(1);
        drop(rx);
        assert_eq!(tx.send(HostEvent::Tick).await, Err(QueueClosed));
        assert_eq!(tx.try_send(HostEvent::RevivePop), Err(QueueClosed));
    }
}
