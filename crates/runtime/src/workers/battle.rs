//! Battle worker that owns the authoritative [`BattleManager`].
//!
//! Receives commands from [`crate::BattleHandle`], advances the battle on a
//! fixed interval while it is running, and publishes what changed to the event
//! bus and the listener registry.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use arena_core::{BattleManager, BattleOutcome, BattleState, TickOutcome};

use crate::api::{BattleSnapshot, ListenerRegistry, Result};
use crate::events::{BattleEvent, EventBus};

/// Commands that can be sent to the battle worker
pub(crate) enum Command {
    Start {
        reply: oneshot::Sender<Result<()>>,
    },
    Pause {
        reply: oneshot::Sender<Result<()>>,
    },
    Resume {
        reply: oneshot::Sender<Result<()>>,
    },
    TogglePause {
        reply: oneshot::Sender<Result<bool>>,
    },
    Cleanup {
        reply: oneshot::Sender<()>,
    },
    Replace {
        battle: Box<BattleManager>,
        reply: oneshot::Sender<()>,
    },
    CanStart {
        reply: oneshot::Sender<Vec<String>>,
    },
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
}

/// Background task driving one battle at a time.
///
/// The interval exists only while the battle is running: pausing or ending
/// drops it, resuming creates a new one whose first tick is a full period away.
pub(crate) struct BattleWorker {
    battle: BattleManager,
    period: Duration,
    interval: Option<Interval>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    listeners: ListenerRegistry,
}

impl BattleWorker {
    pub(crate) fn new(
        battle: BattleManager,
        period: Duration,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        listeners: ListenerRegistry,
    ) -> Self {
        Self {
            battle,
            period,
            interval: None,
            command_rx,
            event_bus,
            listeners,
        }
    }

    /// Main worker loop. Exits once every handle is dropped.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut self.interval) => self.on_tick(),
            }
        }
        debug!(target: "arena::runtime", "battle worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.start();
                if reply.send(result).is_err() {
                    debug!(target: "arena::runtime", "Start reply channel closed (caller dropped)");
                }
            }
            Command::Pause { reply } => {
                let result = self.pause();
                if reply.send(result).is_err() {
                    debug!(target: "arena::runtime", "Pause reply channel closed (caller dropped)");
                }
            }
            Command::Resume { reply } => {
                let result = self.resume();
                if reply.send(result).is_err() {
                    debug!(
                        target: "arena::runtime",
                        "Resume reply channel closed (caller dropped)"
                    );
                }
            }
            Command::TogglePause { reply } => {
                let result = if self.battle.is_paused() {
                    self.resume().map(|()| false)
                } else {
                    self.pause().map(|()| true)
                };
                if reply.send(result).is_err() {
                    debug!(
                        target: "arena::runtime",
                        "TogglePause reply channel closed (caller dropped)"
                    );
                }
            }
            Command::Cleanup { reply } => {
                self.cleanup();
                let _ = reply.send(());
            }
            Command::Replace { battle, reply } => {
                self.cleanup();
                self.battle = *battle;
                self.event_bus.publish(BattleEvent::Replaced {
                    state: self.battle.state(),
                });
                self.listeners.notify();
                let _ = reply.send(());
            }
            Command::CanStart { reply } => {
                let _ = reply.send(self.battle.can_start_battle());
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(BattleSnapshot::capture(&self.battle));
            }
        }
    }

    fn start(&mut self) -> Result<()> {
        self.battle.start_battle()?;

        info!(
            target: "arena::runtime",
            round = self.battle.round(),
            player = self.battle.player().name(),
            ai = self.battle.ai().name(),
            seed = self.battle.seed(),
            "battle started"
        );
        self.event_bus.publish(BattleEvent::Started {
            round: self.battle.round(),
        });
        // start_battle clears the log, so everything in it is new.
        self.publish_log_since(0);
        self.start_timer();
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.battle.pause_battle()?;
        self.interval = None;
        debug!(target: "arena::runtime", turn = self.battle.turn_count(), "battle paused");
        self.event_bus.publish(BattleEvent::Paused);
        self.listeners.notify();
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.battle.resume_battle()?;
        self.start_timer();
        debug!(target: "arena::runtime", turn = self.battle.turn_count(), "battle resumed");
        self.event_bus.publish(BattleEvent::Resumed);
        self.listeners.notify();
        Ok(())
    }

    fn cleanup(&mut self) {
        self.interval = None;
        if self.battle.state() == BattleState::Ended {
            return;
        }
        let was_started = self.battle.state() == BattleState::InProgress;
        self.battle.cleanup();
        if was_started {
            info!(target: "arena::runtime", turn = self.battle.turn_count(), "battle cleaned up");
        }
        self.event_bus.publish(BattleEvent::Ended {
            winner: None,
            outcome: None,
        });
        self.listeners.notify();
    }

    fn start_timer(&mut self) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn on_tick(&mut self) {
        // A stale tick after pause/end is a no-op.
        if !self.battle.is_running() {
            self.interval = None;
            return;
        }

        let logged = self.battle.battle_log().len();
        let outcome = self.battle.advance_tick();
        self.publish_log_since(logged);

        let acted = match outcome {
            TickOutcome::Advanced { turns } => turns,
            _ => Vec::new(),
        };
        if !acted.is_empty() {
            debug!(
                target: "arena::runtime",
                turn = self.battle.turn_count(),
                ?acted,
                "tick resolved turns"
            );
        }
        self.event_bus.publish(BattleEvent::Tick {
            turn_count: self.battle.turn_count(),
            acted,
        });
        self.listeners.notify();

        if self.battle.state() == BattleState::Ended {
            self.finish(self.battle.outcome());
        }
    }

    fn finish(&mut self, outcome: Option<BattleOutcome>) {
        self.interval = None;
        info!(
            target: "arena::runtime",
            turn = self.battle.turn_count(),
            winner = self.battle.winner().map(|c| c.name()).unwrap_or("nobody"),
            "battle ended"
        );
        self.event_bus.publish(BattleEvent::Ended {
            winner: outcome.and_then(BattleOutcome::winner),
            outcome,
        });
        self.listeners.notify();
    }

    /// Publish every log entry from `index` on, one notification per entry.
    fn publish_log_since(&self, index: usize) {
        for entry in self.battle.battle_log().since(index) {
            self.event_bus.publish(BattleEvent::Log(entry.clone()));
            self.listeners.notify();
        }
    }
}

async fn next_tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
