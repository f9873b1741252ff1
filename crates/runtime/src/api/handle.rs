//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for the
//! battle lifecycle, plus synchronous listener and event subscription.
use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{BattleManager, BattleOutcome, BattleState, Character, LogEntry, Side};

use super::errors::{Result, RuntimeError};
use super::listeners::{ListenerId, ListenerRegistry, Subscription};
use crate::events::{BattleEvent, EventBus};
use crate::workers::Command;

/// Read-only copy of the battle taken between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub paused: bool,
    pub round: u32,
    pub turn_count: u32,
    pub player: Character,
    pub ai: Character,
    pub log: Vec<LogEntry>,
    pub outcome: Option<BattleOutcome>,
}

impl BattleSnapshot {
    pub(crate) fn capture(battle: &BattleManager) -> Self {
        Self {
            state: battle.state(),
            paused: battle.is_paused(),
            round: battle.round(),
            turn_count: battle.turn_count(),
            player: battle.player().clone(),
            ai: battle.ai().clone(),
            log: battle.battle_log().entries().to_vec(),
            outcome: battle.outcome(),
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.and_then(BattleOutcome::winner)
    }

    pub fn is_player_victorious(&self) -> bool {
        self.winner() == Some(Side::Player)
    }
}

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    listeners: ListenerRegistry,
}

impl BattleHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        listeners: ListenerRegistry,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            listeners,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Validate and start the battle, then begin ticking.
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await?
    }

    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Command::Pause { reply }).await?
    }

    pub async fn resume(&self) -> Result<()> {
        self.request(|reply| Command::Resume { reply }).await?
    }

    /// Returns `true` if the battle is paused afterwards.
    pub async fn toggle_pause(&self) -> Result<bool> {
        self.request(|reply| Command::TogglePause { reply }).await?
    }

    /// Stop ticking and force the battle to `Ended`.
    pub async fn cleanup(&self) -> Result<()> {
        self.request(|reply| Command::Cleanup { reply }).await
    }

    /// Clean up the current battle and take ownership of `battle`.
    pub async fn replace(&self, battle: BattleManager) -> Result<()> {
        self.request(|reply| Command::Replace {
            battle: Box::new(battle),
            reply,
        })
        .await
    }

    /// Reasons the battle cannot start; empty when startable.
    pub async fn can_start(&self) -> Result<Vec<String>> {
        self.request(|reply| Command::CanStart { reply }).await
    }

    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Register a zero-argument change listener.
    ///
    /// The returned [`Subscription`] unsubscribes it.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BattleEvent> {
        self.event_bus.subscribe()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
