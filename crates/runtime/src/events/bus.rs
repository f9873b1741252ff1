//! Broadcast event bus.

use arena_core::{BattleOutcome, BattleState, LogEntry, Side};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Something that happened to the battle owned by the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    /// The battle left `NotStarted`.
    Started { round: u32 },
    /// One timer tick was processed.
    Tick { turn_count: u32, acted: Vec<Side> },
    /// A new battle-log entry.
    Log(LogEntry),
    Paused,
    Resumed,
    /// The battle reached `Ended`. `outcome` is `None` after a forced cleanup.
    Ended {
        winner: Option<Side>,
        outcome: Option<BattleOutcome>,
    },
    /// The worker swapped in a fresh battle.
    Replaced { state: BattleState },
}

/// Event bus backed by a single broadcast channel.
///
/// Publishing never blocks; events sent while nobody is subscribed are
/// dropped, and slow subscribers observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BattleEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: BattleEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "arena::runtime", "no event subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribers_receive_in_order() {
        let bus = EventBus::with_capacity(8);
        let mut rx = bus.subscribe();

        bus.publish(BattleEvent::Started { round: 2 });
        bus.publish(BattleEvent::Paused);

        assert_eq!(rx.try_recv().unwrap(), BattleEvent::Started { round: 2 });
        assert_eq!(rx.try_recv().unwrap(), BattleEvent::Paused);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::new();
        bus.publish(BattleEvent::Resumed);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
